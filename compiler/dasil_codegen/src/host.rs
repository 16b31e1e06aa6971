//! Flat entry points for an embedding host runtime.
//!
//! A host that cannot hold Rust borrows talks to the backend through a
//! [`Session`]: every operation is one method taking and returning `Copy`
//! handles. Contexts, argument lists and builders live in generation-checked
//! slots, so releasing one makes every copy of its handle stale; using or
//! releasing a stale handle is reported as [`CodegenError::StaleHandle`]
//! rather than being undefined. Handles are also tied to the session that
//! issued them: presenting one to another session reports
//! [`CodegenError::ForeignHandle`].
//!
//! IR handles ([`Type`], [`Value`], [`Function`], [`BasicBlock`]) are the
//! ordinary context-stamped handles; ownership of the objects they name
//! always stays with the context.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::{
    ArgList, BasicBlock, BinaryOp, CodegenError, CodegenOptions, Context, Function, HandleKind,
    Result, Type, Value,
};

// ---------------------------------------------------------------------------
// Generation-checked slots
// ---------------------------------------------------------------------------

/// Identity of one session, carried by every key it issues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct SessionStamp(u64);

impl SessionStamp {
    fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Issuing session, index, and the generation the index was issued at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct SlotKey {
    owner: SessionStamp,
    index: u32,
    generation: u32,
}

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Arena whose released slots are reused under a new generation.
///
/// Keys from another session report `ForeignHandle`; keys whose slot was
/// released report `StaleHandle`.
struct Slots<T> {
    owner: SessionStamp,
    kind: HandleKind,
    entries: Vec<Slot<T>>,
    free: Vec<u32>,
}

impl<T> Slots<T> {
    fn new(owner: SessionStamp, kind: HandleKind) -> Self {
        Self {
            owner,
            kind,
            entries: Vec::new(),
            free: Vec::new(),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn insert(&mut self, value: T) -> SlotKey {
        if let Some(index) = self.free.pop() {
            if let Some(slot) = self.entries.get_mut(index as usize) {
                slot.value = Some(value);
                return SlotKey {
                    owner: self.owner,
                    index,
                    generation: slot.generation,
                };
            }
        }
        let index = self.entries.len() as u32;
        self.entries.push(Slot {
            generation: 0,
            value: Some(value),
        });
        SlotKey {
            owner: self.owner,
            index,
            generation: 0,
        }
    }

    /// The live slot for `key`.
    fn slot_mut(&mut self, key: SlotKey) -> Result<&mut Slot<T>> {
        if key.owner != self.owner {
            return Err(CodegenError::ForeignHandle { kind: self.kind });
        }
        let kind = self.kind;
        self.entries
            .get_mut(key.index as usize)
            .filter(|slot| slot.generation == key.generation && slot.value.is_some())
            .ok_or(CodegenError::StaleHandle { kind })
    }

    fn get(&self, key: SlotKey) -> Result<&T> {
        if key.owner != self.owner {
            return Err(CodegenError::ForeignHandle { kind: self.kind });
        }
        self.entries
            .get(key.index as usize)
            .filter(|slot| slot.generation == key.generation)
            .and_then(|slot| slot.value.as_ref())
            .ok_or(CodegenError::StaleHandle { kind: self.kind })
    }

    fn get_mut(&mut self, key: SlotKey) -> Result<&mut T> {
        let kind = self.kind;
        self.slot_mut(key)?
            .value
            .as_mut()
            .ok_or(CodegenError::StaleHandle { kind })
    }

    /// Take the value out and retire the key.
    fn remove(&mut self, key: SlotKey) -> Result<T> {
        let kind = self.kind;
        let slot = self.slot_mut(key)?;
        let value = slot
            .value
            .take()
            .ok_or(CodegenError::StaleHandle { kind })?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(key.index);
        Ok(value)
    }

    fn iter(&self) -> impl Iterator<Item = (SlotKey, &T)> {
        let owner = self.owner;
        self.entries
            .iter()
            .enumerate()
            .filter_map(move |(index, slot)| {
                #[allow(clippy::cast_possible_truncation)]
                let key = SlotKey {
                    owner,
                    index: index as u32,
                    generation: slot.generation,
                };
                slot.value.as_ref().map(|value| (key, value))
            })
    }

    fn len(&self) -> usize {
        self.entries.iter().filter(|slot| slot.value.is_some()).count()
    }
}

// ---------------------------------------------------------------------------
// Host handles
// ---------------------------------------------------------------------------

/// Host handle to a [`Context`] owned by a [`Session`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ContextHandle(SlotKey);

/// Host handle to an [`ArgList`] owned by a [`Session`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ArgListHandle(SlotKey);

/// Host handle to a builder cursor owned by a [`Session`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BuilderHandle(SlotKey);

/// A builder cursor detached from any borrow of its context.
struct BuilderSlot {
    context: ContextHandle,
    block: BasicBlock,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Owner of every host-visible context, argument list and builder.
pub struct Session {
    options: CodegenOptions,
    contexts: Slots<Context>,
    arg_lists: Slots<ArgList>,
    builders: Slots<BuilderSlot>,
}

impl Session {
    /// A session whose contexts use default options.
    pub fn new() -> Self {
        Self::with_options(CodegenOptions::default())
    }

    /// A session whose contexts are all created with `options`.
    pub fn with_options(options: CodegenOptions) -> Self {
        let stamp = SessionStamp::fresh();
        Self {
            options,
            contexts: Slots::new(stamp, HandleKind::Context),
            arg_lists: Slots::new(stamp, HandleKind::ArgList),
            builders: Slots::new(stamp, HandleKind::Builder),
        }
    }

    /// Number of contexts not yet released.
    pub fn live_contexts(&self) -> usize {
        self.contexts.len()
    }

    /// Borrow a live context.
    pub fn context(&self, handle: ContextHandle) -> Result<&Context> {
        self.contexts.get(handle.0)
    }

    fn context_mut(&mut self, handle: ContextHandle) -> Result<&mut Context> {
        self.contexts.get_mut(handle.0)
    }

    // -- Context lifecycle --

    pub fn create_context(&mut self) -> ContextHandle {
        ContextHandle(self.contexts.insert(Context::with_options(self.options.clone())))
    }

    /// Release a context and everything it owns.
    ///
    /// Builders attached to its blocks become stale as well.
    pub fn release_context(&mut self, handle: ContextHandle) -> Result<()> {
        drop(self.contexts.remove(handle.0)?);
        let orphaned: Vec<SlotKey> = self
            .builders
            .iter()
            .filter(|(_, b)| b.context == handle)
            .map(|(key, _)| key)
            .collect();
        for key in orphaned {
            self.builders.remove(key)?;
        }
        Ok(())
    }

    // -- Types --

    pub fn int32_type(&self, ctx: ContextHandle) -> Result<Type> {
        Ok(self.context(ctx)?.int32_type())
    }

    pub fn float_type(&self, ctx: ContextHandle) -> Result<Type> {
        Ok(self.context(ctx)?.float_type())
    }

    // -- Argument lists --

    pub fn create_arg_list(&mut self) -> ArgListHandle {
        ArgListHandle(self.arg_lists.insert(ArgList::new()))
    }

    pub fn add_argument(&mut self, list: ArgListHandle, name: &str, ty: Type) -> Result<()> {
        self.arg_lists.get_mut(list.0)?.add(name, ty);
        Ok(())
    }

    pub fn release_arg_list(&mut self, list: ArgListHandle) -> Result<()> {
        self.arg_lists.remove(list.0).map(|_| ())
    }

    // -- Functions and blocks --

    pub fn create_function(
        &mut self,
        ctx: ContextHandle,
        name: &str,
        list: ArgListHandle,
        return_type: Type,
    ) -> Result<Function> {
        let args = self.arg_lists.get(list.0)?;
        let cx = self.contexts.get_mut(ctx.0)?;
        cx.create_function(name, args, return_type)
    }

    pub fn create_basic_block(
        &mut self,
        ctx: ContextHandle,
        name: &str,
        function: Function,
    ) -> Result<BasicBlock> {
        self.context_mut(ctx)?.create_basic_block(name, function)
    }

    // -- Builders --

    /// Attach a builder to `block`, locating its owning context.
    pub fn create_builder(&mut self, block: BasicBlock) -> Result<BuilderHandle> {
        let context = self
            .contexts
            .iter()
            .find(|(_, cx)| cx.owns_block(block))
            .map(|(key, _)| ContextHandle(key))
            .ok_or(CodegenError::StaleHandle {
                kind: HandleKind::Block,
            })?;
        self.context_mut(context)?.create_builder(block)?;
        Ok(BuilderHandle(
            self.builders.insert(BuilderSlot { context, block }),
        ))
    }

    pub fn release_builder(&mut self, builder: BuilderHandle) -> Result<()> {
        self.builders.remove(builder.0).map(|_| ())
    }

    /// Run `f` with a live builder for `handle`.
    fn with_builder<T>(
        &mut self,
        handle: BuilderHandle,
        f: impl FnOnce(&mut crate::Builder<'_>) -> Result<T>,
    ) -> Result<T> {
        let &BuilderSlot { context, block } = self.builders.get(handle.0)?;
        let mut bx = self.context_mut(context)?.create_builder(block)?;
        f(&mut bx)
    }

    pub fn emit_int_const(&mut self, value: i32, builder: BuilderHandle) -> Result<Value> {
        self.with_builder(builder, |bx| Ok(bx.int_const(value)))
    }

    /// Truncates through the integer path, see [`crate::Builder::float_const`].
    pub fn emit_float_const(&mut self, value: f64, builder: BuilderHandle) -> Result<Value> {
        self.with_builder(builder, |bx| Ok(bx.float_const(value)))
    }

    pub fn build_binary_op(
        &mut self,
        op: BinaryOp,
        lhs: Value,
        rhs: Value,
        builder: BuilderHandle,
    ) -> Result<Value> {
        self.with_builder(builder, |bx| bx.binary_op(op, lhs, rhs))
    }

    pub fn build_return(&mut self, value: Value, builder: BuilderHandle) -> Result<()> {
        self.with_builder(builder, |bx| bx.ret(value))
    }

    // -- Symbol table --

    pub fn create_variable(&mut self, ctx: ContextHandle, name: &str, value: Value) -> Result<()> {
        self.context_mut(ctx)?.bind_variable(name, value)
    }

    pub fn get_variable(&self, ctx: ContextHandle, name: &str) -> Result<Value> {
        self.context(ctx)?.lookup_variable(name)
    }

    pub fn null_value(&self) -> Value {
        Value::NULL
    }

    // -- Rendering --

    pub fn render_module(&self, ctx: ContextHandle) -> Result<String> {
        Ok(self.context(ctx)?.render_module())
    }

    pub fn print_module(&self, ctx: ContextHandle) -> Result<()> {
        self.context(ctx)?.print_module()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
