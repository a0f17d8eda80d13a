//! Decorator metadata model and rendering (spec §3, §4.5).
//!
//! Grounded on the Angular downlevel-decorators port's `DecoratorMetadata`/
//! `ParameterDecorationInfo`/`create_ctor_parameters_class_property`/
//! `create_prop_decorators_class_property` shapes, which tsickle's own
//! transform is explicitly a predecessor of; renamed to this crate's
//! vocabulary (`DecoratorCall`, `ParameterEntry`, `ClassMetadata`).

use rustc_hash::FxHashMap;

/// One decorator application lowered to data: `{type: Name}` or
/// `{type: Name, args: [...]}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecoratorCall {
    pub type_name: String,
    /// `None` for a bare decorator reference (`@Injectable`) or a
    /// zero-argument call (`@Injectable()`) -- spec §4.5 edge case: "a
    /// decorator that is a `CallExpression` with zero arguments emits
    /// `{type: F}` with no `args` key".
    pub args: Option<Vec<String>>,
}

impl DecoratorCall {
    #[must_use]
    pub fn new(type_name: impl Into<String>, args: Option<Vec<String>>) -> Self {
        let args = args.filter(|a| !a.is_empty());
        Self {
            type_name: type_name.into(),
            args,
        }
    }

    fn render(&self) -> String {
        match &self.args {
            Some(args) => format!("{{type: {}, args: [{}]}}", self.type_name, args.join(", ")),
            None => format!("{{type: {}}}", self.type_name),
        }
    }
}

/// One constructor parameter's captured metadata, or `None` if the
/// parameter has neither a resolvable value-identifier type nor any
/// lowered decorators (spec §3: "each entry is either null or a pair").
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParameterEntry {
    pub type_ref: Option<String>,
    pub decorators: Vec<DecoratorCall>,
}

impl ParameterEntry {
    /// Builds an entry, collapsing to `None` when there's nothing worth
    /// keeping (no type and no decorators).
    #[must_use]
    pub fn capture(type_ref: Option<String>, decorators: Vec<DecoratorCall>) -> Option<Self> {
        if type_ref.is_none() && decorators.is_empty() {
            return None;
        }
        Some(Self { type_ref, decorators })
    }

    fn render(&self) -> String {
        let type_name = self.type_ref.as_deref().unwrap_or("undefined");
        if self.decorators.is_empty() {
            format!("{{type: {type_name}}}")
        } else {
            let rendered: Vec<String> = self.decorators.iter().map(DecoratorCall::render).collect();
            format!("{{type: {type_name}, decorators: [{}]}}", rendered.join(", "))
        }
    }
}

/// Everything captured while traversing one class (spec §3's
/// `DecoratorMetadata`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassMetadata {
    pub class_decorators: Vec<DecoratorCall>,
    pub ctor_params: Vec<Option<ParameterEntry>>,
    /// Insertion-ordered so rendering is deterministic; `FxHashMap`
    /// iteration isn't, so callers needing deterministic output should
    /// sort before rendering. Kept as a map because lookups by member
    /// name matter more than iteration order for callers inspecting the
    /// metadata directly.
    pub member_decorators: FxHashMap<String, Vec<DecoratorCall>>,
}

impl ClassMetadata {
    /// Spec §3 invariant: "a class appears in the metadata table iff at
    /// least one of its decorators, constructor parameters, or member
    /// decorators is flagged `@Annotation`". A captured [`ParameterEntry`]
    /// with a type but no decorators doesn't itself count -- types are
    /// captured for every parameter once the class qualifies, so they
    /// can't be the thing that qualifies it.
    #[must_use]
    pub fn has_any_annotation(&self) -> bool {
        !self.class_decorators.is_empty()
            || self
                .ctor_params
                .iter()
                .any(|p| p.as_ref().is_some_and(|entry| !entry.decorators.is_empty()))
            || self.member_decorators.values().any(|d| !d.is_empty())
    }

    fn render_decorators_field(&self) -> String {
        let entries: Vec<String> = self.class_decorators.iter().map(DecoratorCall::render).collect();
        format!("static decorators: {{type: Function, args?: any[]}}[] = [{}];", entries.join(", "))
    }

    fn render_ctor_parameters_field(&self) -> String {
        let entries: Vec<String> = self
            .ctor_params
            .iter()
            .map(|p| p.as_ref().map_or_else(|| "null".to_string(), ParameterEntry::render))
            .collect();
        format!(
            "static ctorParameters: () => (null|{{type: ?, decorators?: {{type: Function, args?: any[]}}[]}})[] = () => [{}];",
            entries.join(", ")
        )
    }

    fn render_prop_decorators_field(&self) -> String {
        let mut names: Vec<&String> = self.member_decorators.keys().collect();
        names.sort();
        let entries: Vec<String> = names
            .into_iter()
            .map(|name| {
                let decorators = &self.member_decorators[name];
                let rendered: Vec<String> = decorators.iter().map(DecoratorCall::render).collect();
                format!("{name}: [{}]", rendered.join(", "))
            })
            .collect();
        format!("static propDecorators: {{[key: string]: {{type: Function, args?: any[]}}[]}} = {{{}}};", entries.join(", "))
    }

    /// Render the static-property block to insert before a class's
    /// closing brace. Each enabled field is emitted on its own line;
    /// fields with nothing to say are omitted (spec §4.5 steps 4).
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        if !self.class_decorators.is_empty() {
            out.push_str(&self.render_decorators_field());
            out.push('\n');
        }
        if !self.ctor_params.is_empty() {
            out.push_str(&self.render_ctor_parameters_field());
            out.push('\n');
        }
        if !self.member_decorators.is_empty() {
            out.push_str(&self.render_prop_decorators_field());
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_arg_call_renders_without_args_key() {
        let call = DecoratorCall::new("Injectable", Some(vec![]));
        assert_eq!(call.render(), "{type: Injectable}");
    }

    #[test]
    fn call_with_args_renders_args_array() {
        let call = DecoratorCall::new("Inject", Some(vec!["TOKEN".to_string()]));
        assert_eq!(call.render(), "{type: Inject, args: [TOKEN]}");
    }

    #[test]
    fn parameter_with_no_type_and_no_decorators_collapses_to_none() {
        assert!(ParameterEntry::capture(None, vec![]).is_none());
    }

    #[test]
    fn parameter_with_type_only_renders_plain_type() {
        let entry = ParameterEntry::capture(Some("Svc".to_string()), vec![]).unwrap();
        assert_eq!(entry.render(), "{type: Svc}");
    }

    #[test]
    fn ctor_parameters_field_uses_null_for_uncaptured_params() {
        let mut metadata = ClassMetadata::default();
        metadata.ctor_params = vec![ParameterEntry::capture(Some("Svc".to_string()), vec![]), None];
        let rendered = metadata.render_ctor_parameters_field();
        assert!(rendered.contains("[{type: Svc}, null]"));
    }

    #[test]
    fn class_with_only_captured_types_does_not_count_as_annotated() {
        let mut metadata = ClassMetadata::default();
        metadata.ctor_params = vec![ParameterEntry::capture(Some("Svc".to_string()), vec![])];
        assert!(!metadata.has_any_annotation());
    }

    #[test]
    fn class_with_a_lowered_class_decorator_counts_as_annotated() {
        let mut metadata = ClassMetadata::default();
        metadata.class_decorators.push(DecoratorCall::new("Component", None));
        assert!(metadata.has_any_annotation());
    }
}
