//! Codegen configuration.

/// Module identifier used when none is configured.
const DEFAULT_MODULE_NAME: &str = "dasil";

/// Options fixed at context creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodegenOptions {
    /// Identifier printed in the module header.
    pub module_name: String,
    /// Print the module to stderr before evaluating it.
    pub dump_ir: bool,
}

impl CodegenOptions {
    /// Read options from `DASIL_MODULE_NAME` and `DASIL_DEBUG_IR`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read options through `lookup`, treating empty values as unset.
    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let set = |key: &str| lookup(key).filter(|v| !v.is_empty());
        Self {
            module_name: set("DASIL_MODULE_NAME").unwrap_or_else(|| DEFAULT_MODULE_NAME.to_owned()),
            dump_ir: set("DASIL_DEBUG_IR").is_some(),
        }
    }

    #[must_use]
    pub fn with_module_name(mut self, name: impl Into<String>) -> Self {
        self.module_name = name.into();
        self
    }

    #[must_use]
    pub fn with_dump_ir(mut self, dump_ir: bool) -> Self {
        self.dump_ir = dump_ir;
        self
    }
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            module_name: DEFAULT_MODULE_NAME.to_owned(),
            dump_ir: false,
        }
    }
}
