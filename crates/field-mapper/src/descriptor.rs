//! Descriptors and type override tables.
//!
//! A [`Descriptor`] answers for one index intent: given a field name and an
//! optional type tag it produces the output field name and the converter
//! for the value. [`TableDescriptor`] is the configuration-backed kind,
//! driven by a [`TypeTable`] of per-type suffix rules with a default.
//!
//! Type tables can be derived from a parent table. A derived table holds
//! only the entries it overrides and keeps an explicit reference to its
//! parent; lookups walk that chain. [`DerivedDescriptor`] does the same for
//! any descriptor, e.g. a [`FlagDescriptor`] that composes its suffix from
//! the data type and a set of index flags.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::converter::Converter;
use crate::types::TypeTag;

/// Output field name plus the converter for its value.
#[derive(Debug, Clone)]
pub struct NamedConverter {
    /// Output field name.
    pub name: String,
    /// Converter for the raw value.
    pub converter: Converter,
}

impl NamedConverter {
    /// Output name with the identity converter.
    pub fn name_only(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            converter: Converter::Identity,
        }
    }

    /// Output name with an explicit converter.
    pub fn new(name: impl Into<String>, converter: Converter) -> Self {
        Self {
            name: name.into(),
            converter,
        }
    }
}

/// Resolved rule for one index intent.
///
/// Implementations must be deterministic and free of side effects for a
/// given `(field_name, field_type)` pair.
pub trait Descriptor: Send + Sync + fmt::Debug {
    /// Produces the output name and converter for a field.
    ///
    /// Only called with `field_type == None` when
    /// [`requires_type`](Descriptor::requires_type) returns false.
    fn name_and_converter(&self, field_name: &str, field_type: Option<&TypeTag>) -> NamedConverter;

    /// Returns true when this descriptor cannot pick a rule without a type.
    fn requires_type(&self) -> bool {
        false
    }

    /// Returns true when this descriptor has a rule for `field_type`.
    fn accepts_type(&self, field_type: Option<&TypeTag>) -> bool {
        field_type.is_some() || !self.requires_type()
    }

    /// Returns the configuration-backed table, if this descriptor has one.
    fn type_table(&self) -> Option<&Arc<TypeTable>> {
        None
    }

    /// Returns the options declared for the intent, if any.
    fn options(&self) -> Option<&IntentOptions> {
        None
    }
}

/// A suffix rule: the output name is `field_name + suffix`.
#[derive(Debug, Clone)]
pub struct Rule {
    /// Suffix appended to the field name.
    pub suffix: String,
    /// Converter for the value.
    pub converter: Converter,
}

impl Rule {
    /// Suffix with the identity converter.
    pub fn suffix(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            converter: Converter::Identity,
        }
    }

    /// Sets the converter.
    pub fn with_converter(mut self, converter: Converter) -> Self {
        self.converter = converter;
        self
    }

    /// Applies the rule to a field name.
    pub fn apply(&self, field_name: &str) -> NamedConverter {
        NamedConverter::new(format!("{}{}", field_name, self.suffix), self.converter.clone())
    }
}

/// Per-type suffix rules with a default, optionally derived from a parent.
///
/// A root table always has a default rule; a derived table may omit it and
/// inherit its parent's. Lookup checks this table's type entries, then each
/// ancestor's, then the nearest default in the chain.
#[derive(Debug, Clone)]
pub struct TypeTable {
    types: IndexMap<TypeTag, Rule>,
    origin: Origin,
}

#[derive(Debug, Clone)]
enum Origin {
    Root {
        default: Rule,
    },
    Derived {
        default: Option<Rule>,
        parent: Arc<TypeTable>,
    },
}

impl TypeTable {
    /// Creates a root table with the given default rule.
    pub fn new(default: Rule) -> Self {
        Self {
            types: IndexMap::new(),
            origin: Origin::Root { default },
        }
    }

    /// Creates an empty table that inherits everything from `parent`.
    pub fn derive(parent: Arc<TypeTable>) -> Self {
        Self {
            types: IndexMap::new(),
            origin: Origin::Derived {
                default: None,
                parent,
            },
        }
    }

    /// Adds or replaces the rule for a type tag.
    pub fn with_type(mut self, tag: impl Into<TypeTag>, rule: Rule) -> Self {
        self.types.insert(tag.into(), rule);
        self
    }

    /// Overrides the default rule.
    pub fn with_default(mut self, rule: Rule) -> Self {
        match &mut self.origin {
            Origin::Root { default } => *default = rule,
            Origin::Derived { default, .. } => *default = Some(rule),
        }
        self
    }

    /// Returns the parent table, if derived.
    pub fn parent(&self) -> Option<&Arc<TypeTable>> {
        match &self.origin {
            Origin::Root { .. } => None,
            Origin::Derived { parent, .. } => Some(parent),
        }
    }

    /// Iterates over this table and its ancestors, nearest first.
    pub fn chain(&self) -> impl Iterator<Item = &TypeTable> {
        std::iter::successors(Some(self), |t| t.parent().map(Arc::as_ref))
    }

    /// Rule declared for `tag` in this table or an ancestor; no default fallback.
    pub fn rule_for(&self, tag: &TypeTag) -> Option<&Rule> {
        self.chain().find_map(|t| t.types.get(tag))
    }

    /// Nearest default rule in the chain.
    pub fn default_rule(&self) -> &Rule {
        match &self.origin {
            Origin::Root { default } => default,
            Origin::Derived {
                default: Some(default),
                ..
            } => default,
            Origin::Derived {
                default: None,
                parent,
            } => parent.default_rule(),
        }
    }

    /// Rule for `tag`, falling back to the default.
    pub fn lookup(&self, tag: Option<&TypeTag>) -> &Rule {
        tag.and_then(|t| self.rule_for(t))
            .unwrap_or_else(|| self.default_rule())
    }

    /// Type tags with explicit rules in this table only (not ancestors).
    pub fn own_types(&self) -> impl Iterator<Item = (&TypeTag, &Rule)> {
        self.types.iter()
    }

    /// Returns true when any table in the chain has per-type rules.
    pub fn is_type_sensitive(&self) -> bool {
        self.chain().any(|t| !t.types.is_empty())
    }
}

/// Options declared on an intent in a mapping file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntentOptions {
    /// The intent applies to fields automatically.
    pub default: bool,
    /// Any other options, kept verbatim.
    pub extra: IndexMap<String, serde_yaml_ng::Value>,
}

/// Descriptor backed by a [`TypeTable`].
#[derive(Debug, Clone)]
pub struct TableDescriptor {
    table: Arc<TypeTable>,
    options: IntentOptions,
}

impl TableDescriptor {
    /// Creates a descriptor over a table.
    pub fn new(table: TypeTable) -> Self {
        Self {
            table: Arc::new(table),
            options: IntentOptions::default(),
        }
    }

    /// Type-insensitive descriptor: every type gets `suffix`.
    pub fn suffix(suffix: impl Into<String>) -> Self {
        Self::new(TypeTable::new(Rule::suffix(suffix)))
    }

    /// Sets the intent options.
    pub fn with_options(mut self, options: IntentOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the backing table.
    pub fn table(&self) -> &Arc<TypeTable> {
        &self.table
    }

    /// Returns the intent options.
    pub fn intent_options(&self) -> &IntentOptions {
        &self.options
    }
}

impl Descriptor for TableDescriptor {
    fn name_and_converter(&self, field_name: &str, field_type: Option<&TypeTag>) -> NamedConverter {
        self.table.lookup(field_type).apply(field_name)
    }

    fn requires_type(&self) -> bool {
        self.table.is_type_sensitive()
    }

    fn type_table(&self) -> Option<&Arc<TypeTable>> {
        Some(&self.table)
    }

    fn options(&self) -> Option<&IntentOptions> {
        Some(&self.options)
    }
}

/// Index flag contributing one letter to a composed suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IndexFlag {
    /// `i`
    Indexed,
    /// `s`
    Stored,
    /// `m`
    Multivalued,
}

impl IndexFlag {
    fn code(self) -> char {
        match self {
            IndexFlag::Indexed => 'i',
            IndexFlag::Stored => 's',
            IndexFlag::Multivalued => 'm',
        }
    }
}

/// Descriptor composing its suffix from a type code and index flags:
/// `string` with `[Indexed]` gives `_si`, `text` with all three flags gives
/// `_tesim`.
///
/// The type is the field's own unless fixed with [`FlagDescriptor::of_type`].
/// Tags without an [`index_code`](TypeTag::index_code) are not accepted.
/// Temporal types get the `iso8601` converter.
#[derive(Debug, Clone)]
pub struct FlagDescriptor {
    field_type: Option<TypeTag>,
    flags: Vec<IndexFlag>,
}

impl FlagDescriptor {
    /// Descriptor over the field's type.
    pub fn new(flags: impl IntoIterator<Item = IndexFlag>) -> Self {
        let mut flags: Vec<IndexFlag> = flags.into_iter().collect();
        flags.sort();
        flags.dedup();
        Self {
            field_type: None,
            flags,
        }
    }

    /// Fixes the type, ignoring the field's.
    pub fn of_type(mut self, tag: impl Into<TypeTag>) -> Self {
        self.field_type = Some(tag.into());
        self
    }

    /// Flags in suffix order.
    pub fn flags(&self) -> &[IndexFlag] {
        &self.flags
    }

    fn effective_type<'a>(&'a self, field_type: Option<&'a TypeTag>) -> Option<&'a TypeTag> {
        self.field_type.as_ref().or(field_type)
    }

    /// Suffix for a type, or `None` when the type has no code.
    pub fn suffix_for(&self, tag: &TypeTag) -> Option<String> {
        let code = tag.index_code()?;
        let flags: String = self.flags.iter().map(|f| f.code()).collect();
        Some(format!("_{}{}", code, flags))
    }
}

impl Descriptor for FlagDescriptor {
    fn name_and_converter(&self, field_name: &str, field_type: Option<&TypeTag>) -> NamedConverter {
        let Some(tag) = self.effective_type(field_type) else {
            return NamedConverter::name_only(field_name);
        };
        let converter = if tag.is_temporal() {
            Converter::iso8601()
        } else {
            Converter::Identity
        };
        match self.suffix_for(tag) {
            Some(suffix) => NamedConverter::new(format!("{}{}", field_name, suffix), converter),
            None => NamedConverter::name_only(field_name),
        }
    }

    fn requires_type(&self) -> bool {
        self.field_type.is_none()
    }

    fn accepts_type(&self, field_type: Option<&TypeTag>) -> bool {
        self.effective_type(field_type)
            .is_some_and(|t| t.index_code().is_some())
    }
}

/// Descriptor overriding some data types of a parent descriptor.
///
/// Holds only its own type rules; every other type is delegated to the
/// parent.
#[derive(Debug, Clone)]
pub struct DerivedDescriptor {
    types: IndexMap<TypeTag, Rule>,
    parent: Arc<dyn Descriptor>,
}

impl DerivedDescriptor {
    /// Creates a descriptor that delegates everything to `parent`.
    pub fn new(parent: Arc<dyn Descriptor>) -> Self {
        Self {
            types: IndexMap::new(),
            parent,
        }
    }

    /// Adds or replaces the rule for a type tag.
    pub fn with_type(mut self, tag: impl Into<TypeTag>, rule: Rule) -> Self {
        self.types.insert(tag.into(), rule);
        self
    }

    /// The descriptor this one delegates to.
    pub fn parent(&self) -> &Arc<dyn Descriptor> {
        &self.parent
    }
}

impl Descriptor for DerivedDescriptor {
    fn name_and_converter(&self, field_name: &str, field_type: Option<&TypeTag>) -> NamedConverter {
        match field_type.and_then(|t| self.types.get(t)) {
            Some(rule) => rule.apply(field_name),
            None => self.parent.name_and_converter(field_name, field_type),
        }
    }

    fn requires_type(&self) -> bool {
        self.parent.requires_type()
    }

    fn accepts_type(&self, field_type: Option<&TypeTag>) -> bool {
        field_type.is_some_and(|t| self.types.contains_key(t)) || self.parent.accepts_type(field_type)
    }
}

type DescriptorFn = dyn Fn(&str, Option<&TypeTag>) -> NamedConverter + Send + Sync;

/// Descriptor defined by a closure.
#[derive(Clone)]
pub struct FnDescriptor {
    f: Arc<DescriptorFn>,
    requires_type: bool,
}

impl FnDescriptor {
    /// Wraps a closure. The closure receives `None` for a missing type.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str, Option<&TypeTag>) -> NamedConverter + Send + Sync + 'static,
    {
        Self {
            f: Arc::new(f),
            requires_type: false,
        }
    }

    /// Marks the descriptor as needing a type tag.
    pub fn requiring_type(mut self) -> Self {
        self.requires_type = true;
        self
    }
}

impl Descriptor for FnDescriptor {
    fn name_and_converter(&self, field_name: &str, field_type: Option<&TypeTag>) -> NamedConverter {
        (self.f)(field_name, field_type)
    }

    fn requires_type(&self) -> bool {
        self.requires_type
    }
}

impl fmt::Debug for FnDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnDescriptor")
            .field("requires_type", &self.requires_type)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fungible() -> Arc<TypeTable> {
        Arc::new(
            TypeTable::new(Rule::suffix("_f2"))
                .with_type(TypeTag::Integer, Rule::suffix("_f1"))
                .with_type(TypeTag::Date, Rule::suffix("_f0")),
        )
    }

    #[test]
    fn test_type_fallback_to_default() {
        let table = fungible();
        assert_eq!(table.lookup(Some(&TypeTag::Integer)).suffix, "_f1");
        assert_eq!(table.lookup(Some(&TypeTag::Date)).suffix, "_f0");
        assert_eq!(table.lookup(Some(&TypeTag::from("garble"))).suffix, "_f2");
        assert_eq!(table.lookup(None).suffix, "_f2");
    }

    #[test]
    fn test_derived_table_inherits_from_parent() {
        let derived = TypeTable::derive(fungible())
            .with_type("garble", Rule::suffix("_f4"))
            .with_type(TypeTag::Integer, Rule::suffix("_f5"));

        assert_eq!(derived.lookup(Some(&TypeTag::Integer)).suffix, "_f5");
        assert_eq!(derived.lookup(Some(&TypeTag::from("garble"))).suffix, "_f4");
        assert_eq!(derived.lookup(Some(&TypeTag::Date)).suffix, "_f0");
        assert_eq!(derived.lookup(Some(&TypeTag::from("fratz"))).suffix, "_f2");
        assert_eq!(derived.chain().count(), 2);
        assert_eq!(derived.own_types().count(), 2);
    }

    #[test]
    fn test_derived_default_override() {
        let derived = TypeTable::derive(fungible()).with_default(Rule::suffix("_f9"));
        assert_eq!(derived.lookup(Some(&TypeTag::String)).suffix, "_f9");
        // Parent type entries still win over the derived default.
        assert_eq!(derived.lookup(Some(&TypeTag::Date)).suffix, "_f0");
    }

    #[test]
    fn test_table_descriptor() {
        let descriptor = TableDescriptor::new((*fungible()).clone());
        assert!(descriptor.requires_type());
        let named = descriptor.name_and_converter("foo", Some(&TypeTag::Integer));
        assert_eq!(named.name, "foo_f1");
        assert!(named.converter.is_identity());

        let plain = TableDescriptor::suffix("_food");
        assert!(!plain.requires_type());
        assert_eq!(plain.name_and_converter("bar", None).name, "bar_food");
    }

    #[test]
    fn test_fn_descriptor() {
        let descriptor = FnDescriptor::new(|name, ty| {
            let suffix = if ty == Some(&TypeTag::Date) { "_d" } else { "_x" };
            NamedConverter::name_only(format!("{}{}", name, suffix))
        });
        assert!(!descriptor.requires_type());
        assert_eq!(
            descriptor.name_and_converter("foo", Some(&TypeTag::Date)).name,
            "foo_d"
        );
        assert!(descriptor.requiring_type().requires_type());
    }

    #[test]
    fn test_flag_descriptor_suffixes() {
        let simple = FlagDescriptor::new([IndexFlag::Indexed]);
        assert!(simple.requires_type());
        assert_eq!(
            simple.name_and_converter("foo", Some(&TypeTag::String)).name,
            "foo_si"
        );
        assert_eq!(
            simple.name_and_converter("foo", Some(&TypeTag::Symbol)).name,
            "foo_si"
        );

        let date = simple.name_and_converter("foo", Some(&TypeTag::Date));
        assert_eq!(date.name, "foo_dti");
        assert!(!date.converter.is_identity());

        let searchable = FlagDescriptor::new([
            IndexFlag::Multivalued,
            IndexFlag::Indexed,
            IndexFlag::Stored,
        ]);
        assert_eq!(
            searchable.name_and_converter("foo", Some(&TypeTag::Text)).name,
            "foo_tesim"
        );
    }

    #[test]
    fn test_flag_descriptor_accepted_types() {
        let simple = FlagDescriptor::new([IndexFlag::Indexed]);
        assert!(simple.accepts_type(Some(&TypeTag::Integer)));
        assert!(!simple.accepts_type(None));
        assert!(!simple.accepts_type(Some(&TypeTag::from("garble"))));

        let fixed = FlagDescriptor::new([IndexFlag::Stored]).of_type(TypeTag::String);
        assert!(!fixed.requires_type());
        assert!(fixed.accepts_type(None));
        assert_eq!(
            fixed.name_and_converter("foo", Some(&TypeTag::Date)).name,
            "foo_ss"
        );
    }

    #[test]
    fn test_derived_descriptor_delegates_to_parent() {
        let parent: Arc<dyn Descriptor> = Arc::new(FlagDescriptor::new([IndexFlag::Indexed]));
        let derived = DerivedDescriptor::new(parent).with_type(TypeTag::Date, Rule::suffix("_d"));

        assert_eq!(
            derived.name_and_converter("foo", Some(&TypeTag::Date)).name,
            "foo_d"
        );
        assert_eq!(
            derived.name_and_converter("foo", Some(&TypeTag::String)).name,
            "foo_si"
        );
        assert!(derived.requires_type());
        assert!(!derived.accepts_type(None));
        assert!(!derived.accepts_type(Some(&TypeTag::from("garble"))));

        let with_garble = derived.with_type("garble", Rule::suffix("_g"));
        assert!(with_garble.accepts_type(Some(&TypeTag::from("garble"))));
    }
}
