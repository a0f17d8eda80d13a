use tsickle_common::span::Span;

#[test]
fn test_span_basics() {
    let span = Span::new(10, 20);
    assert_eq!(span.start, 10);
    assert_eq!(span.end, 20);
    assert_eq!(span.len(), 10);
    assert!(!span.is_empty());
}

#[test]
fn test_span_contains() {
    let span = Span::new(10, 20);
    assert!(span.contains(10));
    assert!(span.contains(15));
    assert!(span.contains(19));
    assert!(!span.contains(9));
    assert!(!span.contains(20));
}

#[test]
fn test_span_slice() {
    let text = "hello world";
    let span = Span::new(6, 11);
    assert_eq!(span.slice(text), "world");
}

#[test]
fn test_span_slice_safe() {
    let text = "hello";
    let span = Span::new(0, 100);
    assert_eq!(span.slice_safe(text), "hello");

    let inverted = Span::new(100, 0);
    assert_eq!(inverted.slice_safe(text), "");
}

#[test]
fn test_span_display() {
    let span = Span::new(10, 20);
    assert_eq!(format!("{}", span), "10..20");
}

#[test]
fn test_span_tuple_conversions() {
    let span: Span = (3, 7).into();
    assert_eq!(span, Span::new(3, 7));
    let pair: (u32, u32) = span.into();
    assert_eq!(pair, (3, 7));
}
