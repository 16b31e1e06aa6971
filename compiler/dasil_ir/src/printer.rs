//! Textual form of a module, in LLVM assembly syntax.
//!
//! ```text
//! ; ModuleID = 'dasil'
//! source_filename = "dasil"
//!
//! define i32 @inc(i32 %n) {
//! entry:
//!   %0 = add i32 %n, 1
//!   ret i32 %0
//! }
//! ```
//!
//! Local names are assigned per function when printing: unnamed parameters,
//! blocks and instruction results get sequential slot numbers, and a name
//! that is already taken in the function gets a numeric suffix.

use std::borrow::Cow;
use std::fmt::{self, Write};

use rustc_hash::{FxHashMap, FxHashSet};

use crate::{BlockId, Function, Inst, Module, ValueId, ValueKind};

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "; ModuleID = '{}'", self.name())?;
        writeln!(f, "source_filename = \"{}\"", escape(self.name()))?;

        let mut unnamed_globals = 0u32;
        for (_, func) in self.functions() {
            let global = if func.name().is_empty() {
                unnamed_globals += 1;
                format!("@{}", unnamed_globals - 1)
            } else {
                format!("@{}", quote_name(func.name()))
            };
            writeln!(f)?;
            FunctionPrinter::new(self, func).print(f, &global)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Local names
// ---------------------------------------------------------------------------

/// Per-function name assignment.
#[derive(Default)]
struct LocalNames {
    used: FxHashSet<String>,
    next_slot: u32,
    next_suffix: u32,
}

impl LocalNames {
    /// Assign a printable name, or the next slot number when `name` is empty.
    fn assign(&mut self, name: &str) -> String {
        if name.is_empty() {
            let slot = self.next_slot;
            self.next_slot += 1;
            return slot.to_string();
        }
        let mut candidate = name.to_owned();
        while !self.used.insert(candidate.clone()) {
            self.next_suffix += 1;
            candidate = format!("{name}{}", self.next_suffix);
        }
        quote_name(&candidate).into_owned()
    }
}

struct FunctionPrinter<'m> {
    module: &'m Module,
    function: &'m Function,
    values: FxHashMap<ValueId, String>,
    labels: FxHashMap<BlockId, String>,
}

impl<'m> FunctionPrinter<'m> {
    fn new(module: &'m Module, function: &'m Function) -> Self {
        let mut names = LocalNames::default();
        let mut values = FxHashMap::default();
        let mut labels = FxHashMap::default();

        for &param in function.params() {
            let name = module.value(param).map(|v| v.name()).unwrap_or_default();
            values.insert(param, format!("%{}", names.assign(name)));
        }
        for &block_id in function.blocks() {
            let Ok(block) = module.block(block_id) else {
                continue;
            };
            labels.insert(block_id, names.assign(block.name()));
            for result in block.insts().iter().filter_map(Inst::result) {
                let name = module.value(result).map(|v| v.name()).unwrap_or_default();
                values.insert(result, format!("%{}", names.assign(name)));
            }
        }

        Self {
            module,
            function,
            values,
            labels,
        }
    }

    fn type_of(&self, value: ValueId) -> Result<String, fmt::Error> {
        let ty = self.module.value_type(value).map_err(|_| fmt::Error)?;
        let kind = self.module.type_kind(ty).map_err(|_| fmt::Error)?;
        Ok(kind.to_string())
    }

    fn operand(&self, value: ValueId) -> Cow<'_, str> {
        match self.module.value(value).map(|v| v.kind()) {
            Ok(ValueKind::ConstInt(c)) => Cow::Owned(c.to_string()),
            Ok(_) => self
                .values
                .get(&value)
                .map_or(Cow::Borrowed("<badref>"), |s| Cow::Borrowed(s.as_str())),
            Err(_) => Cow::Borrowed("<badref>"),
        }
    }

    fn print(&self, f: &mut fmt::Formatter<'_>, global: &str) -> fmt::Result {
        let ret = self
            .module
            .type_kind(self.function.return_type())
            .map_err(|_| fmt::Error)?;

        let mut params = String::new();
        for (i, &param) in self.function.params().iter().enumerate() {
            if i > 0 {
                params.push_str(", ");
            }
            params.push_str(&self.type_of(param)?);
            if !self.function.is_declaration() {
                write!(params, " {}", self.operand(param))?;
            }
        }

        if self.function.is_declaration() {
            return writeln!(f, "declare {ret} {global}({params})");
        }

        writeln!(f, "define {ret} {global}({params}) {{")?;
        for (i, &block_id) in self.function.blocks().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let block = self.module.block(block_id).map_err(|_| fmt::Error)?;
            if let Some(label) = self.labels.get(&block_id) {
                writeln!(f, "{label}:")?;
            }
            for inst in block.insts() {
                self.print_inst(f, inst)?;
            }
        }
        writeln!(f, "}}")
    }

    fn print_inst(&self, f: &mut fmt::Formatter<'_>, inst: &Inst) -> fmt::Result {
        match *inst {
            Inst::Binary {
                op,
                lhs,
                rhs,
                result,
            } => writeln!(
                f,
                "  {} = {op} {} {}, {}",
                self.operand(result),
                self.type_of(result)?,
                self.operand(lhs),
                self.operand(rhs)
            ),
            Inst::Ret { value } => {
                writeln!(f, "  ret {} {}", self.type_of(value)?, self.operand(value))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Quoting
// ---------------------------------------------------------------------------

/// Quote a symbol name unless it is a plain identifier.
///
/// Plain names match `[-a-zA-Z$._][-a-zA-Z$._0-9]*`.
fn quote_name(name: &str) -> Cow<'_, str> {
    let plain_char = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '$' | '.' | '_');
    let starts_with_digit = name.starts_with(|c: char| c.is_ascii_digit());
    if !starts_with_digit && name.chars().all(plain_char) {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(format!("\"{}\"", escape(name)))
    }
}

/// Escape `"`, `\` and non-printable bytes as `\XX`.
fn escape(s: &str) -> Cow<'_, str> {
    let needs_escape = |b: u8| b == b'"' || b == b'\\' || !(0x20..0x7F).contains(&b);
    if !s.bytes().any(needs_escape) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 8);
    for b in s.bytes() {
        if needs_escape(b) {
            let _ = write!(out, "\\{b:02X}");
        } else {
            out.push(char::from(b));
        }
    }
    Cow::Owned(out)
}
