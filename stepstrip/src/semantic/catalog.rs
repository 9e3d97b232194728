//! Metadata types the binder knows about without reading assemblies.

use super::symbol::SymbolIdentity;
use compact_str::CompactString;
use rustc_hash::FxHashMap;
use std::sync::{Arc, OnceLock};

/// Assembly recorded for types added through configuration.
pub const CONFIGURED_ASSEMBLY: &str = "<configured>";

const CORE_ASSEMBLY: &str = "System.Runtime";

/// Attribute types of the base class library commonly found on types and
/// members.
const WELL_KNOWN_TYPES: &[&str] = &[
    "System.AttributeUsageAttribute",
    "System.CLSCompliantAttribute",
    "System.FlagsAttribute",
    "System.ObsoleteAttribute",
    "System.SerializableAttribute",
    "System.NonSerializedAttribute",
    "System.ParamArrayAttribute",
    "System.ThreadStaticAttribute",
    "System.STAThreadAttribute",
    "System.MTAThreadAttribute",
    "System.Diagnostics.ConditionalAttribute",
    "System.Diagnostics.DebuggableAttribute",
    "System.Diagnostics.DebuggerBrowsableAttribute",
    "System.Diagnostics.DebuggerDisplayAttribute",
    "System.Diagnostics.DebuggerHiddenAttribute",
    "System.Diagnostics.DebuggerNonUserCodeAttribute",
    "System.Diagnostics.DebuggerStepThroughAttribute",
    "System.Diagnostics.DebuggerStepperBoundaryAttribute",
    "System.Diagnostics.DebuggerTypeProxyAttribute",
    "System.Diagnostics.StackTraceHiddenAttribute",
    "System.Diagnostics.CodeAnalysis.ExcludeFromCodeCoverageAttribute",
    "System.Diagnostics.CodeAnalysis.SuppressMessageAttribute",
    "System.Diagnostics.CodeAnalysis.DoesNotReturnAttribute",
    "System.Diagnostics.CodeAnalysis.NotNullAttribute",
    "System.Diagnostics.CodeAnalysis.MaybeNullAttribute",
    "System.ComponentModel.BrowsableAttribute",
    "System.ComponentModel.CategoryAttribute",
    "System.ComponentModel.DescriptionAttribute",
    "System.ComponentModel.DefaultValueAttribute",
    "System.ComponentModel.DisplayNameAttribute",
    "System.ComponentModel.EditorBrowsableAttribute",
    "System.Runtime.CompilerServices.CallerMemberNameAttribute",
    "System.Runtime.CompilerServices.CompilerGeneratedAttribute",
    "System.Runtime.CompilerServices.InternalsVisibleToAttribute",
    "System.Runtime.CompilerServices.MethodImplAttribute",
    "System.Runtime.CompilerServices.SkipLocalsInitAttribute",
    "System.Runtime.InteropServices.ComVisibleAttribute",
    "System.Runtime.InteropServices.DllImportAttribute",
    "System.Runtime.InteropServices.GuidAttribute",
    "System.Runtime.InteropServices.StructLayoutAttribute",
    "System.Runtime.Serialization.DataContractAttribute",
    "System.Runtime.Serialization.DataMemberAttribute",
    "System.CodeDom.Compiler.GeneratedCodeAttribute",
];

/// A table of metadata type names and the assemblies declaring them.
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    types: FxHashMap<CompactString, CompactString>,
}

impl TypeCatalog {
    /// An empty catalog
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The base class library attribute types
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut catalog = Self::empty();
        for name in WELL_KNOWN_TYPES {
            catalog.insert(*name, CORE_ASSEMBLY);
        }
        catalog
    }

    /// A process-wide default catalog
    #[must_use]
    pub fn shared_default() -> Arc<Self> {
        static CATALOG: OnceLock<Arc<TypeCatalog>> = OnceLock::new();
        Arc::clone(CATALOG.get_or_init(|| Arc::new(Self::with_defaults())))
    }

    /// Add a type
    pub fn insert(&mut self, metadata_name: impl Into<CompactString>, assembly: impl Into<CompactString>) {
        self.types.insert(metadata_name.into(), assembly.into());
    }

    /// Add fully qualified type names from configuration.
    ///
    /// Names already present keep their assembly.
    pub fn extend_known_types<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() || self.types.contains_key(name) {
                continue;
            }
            self.insert(name, CONFIGURED_ASSEMBLY);
        }
    }

    /// Identity of the type with this metadata name
    #[must_use]
    pub fn get(&self, metadata_name: &str) -> Option<SymbolIdentity> {
        self.types
            .get(metadata_name)
            .map(|assembly| SymbolIdentity::metadata(metadata_name, assembly.clone()))
    }

    /// Whether the catalog has this type
    #[must_use]
    pub fn contains(&self, metadata_name: &str) -> bool {
        self.types.contains_key(metadata_name)
    }

    /// Number of types
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MARKER_METADATA_NAME;

    #[test]
    fn test_defaults_contain_marker() {
        let catalog = TypeCatalog::with_defaults();
        let marker = catalog.get(MARKER_METADATA_NAME).expect("marker type");
        assert_eq!(marker.short_name(), "DebuggerStepThroughAttribute");
        assert!(catalog.get("System.Diagnostics.DebuggerStepThrough").is_none());
    }

    #[test]
    fn test_extend_known_types() {
        let mut catalog = TypeCatalog::empty();
        catalog.insert("System.ObsoleteAttribute", "System.Runtime");
        catalog.extend_known_types(["Company.Tracing.TraceAttribute", " ", "System.ObsoleteAttribute"]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.get("Company.Tracing.TraceAttribute"),
            Some(SymbolIdentity::metadata("Company.Tracing.TraceAttribute", CONFIGURED_ASSEMBLY))
        );
        assert_eq!(
            catalog.get("System.ObsoleteAttribute"),
            Some(SymbolIdentity::metadata("System.ObsoleteAttribute", "System.Runtime"))
        );
    }
}
