//! Compiled method storage
//!
//! Sink into which the backend deposits compiled methods. Identical code
//! blobs are stored once and shared between methods.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::options::InstructionSet;

/// A compiled method as the backend left it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledMethod {
    /// Method index within its bytecode file
    pub method_idx: u32,
    /// Location of the bytecode file
    pub dex_location: String,
    /// Target instruction set
    pub instruction_set: InstructionSet,
    /// Code blob, possibly shared with other methods
    pub code: Arc<[u8]>,
    /// Frame size in bytes
    pub frame_size_in_bytes: u32,
    /// Callee-save core registers spilled
    pub core_spill_mask: u32,
    /// Callee-save FP registers spilled
    pub fp_spill_mask: u32,
}

/// Index of a method within a [`CompiledMethodStorage`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompiledMethodHandle(usize);

impl CompiledMethodHandle {
    /// Position in storage
    pub fn index(self) -> usize {
        self.0
    }
}

/// Storage counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StorageStats {
    /// Number of stored methods
    pub methods: usize,
    /// Code bytes requested, before deduplication
    pub total_code_bytes: usize,
    /// Code bytes actually held
    pub unique_code_bytes: usize,
}

/// Thread-safe store of compiled methods
pub struct CompiledMethodStorage {
    /// Stored methods, in insertion order
    methods: RwLock<Vec<CompiledMethod>>,
    /// Distinct code blobs
    code_blobs: Mutex<FxHashSet<Arc<[u8]>>>,
    /// Whether identical blobs are shared
    dedupe_enabled: bool,
    total_code_bytes: AtomicUsize,
    unique_code_bytes: AtomicUsize,
}

impl CompiledMethodStorage {
    /// Create a storage that deduplicates code
    pub fn new() -> Self {
        Self::with_dedupe(true)
    }

    /// Create a storage, choosing whether identical code is shared
    pub fn with_dedupe(dedupe_enabled: bool) -> Self {
        CompiledMethodStorage {
            methods: RwLock::new(Vec::new()),
            code_blobs: Mutex::new(FxHashSet::default()),
            dedupe_enabled,
            total_code_bytes: AtomicUsize::new(0),
            unique_code_bytes: AtomicUsize::new(0),
        }
    }

    /// Whether identical code is shared
    pub fn dedupe_enabled(&self) -> bool {
        self.dedupe_enabled
    }

    /// Intern a code blob, returning the shared copy
    pub fn intern_code(&self, code: &[u8]) -> Arc<[u8]> {
        self.total_code_bytes.fetch_add(code.len(), Ordering::Relaxed);

        if !self.dedupe_enabled {
            self.unique_code_bytes.fetch_add(code.len(), Ordering::Relaxed);
            return Arc::from(code);
        }

        let mut blobs = self.code_blobs.lock();
        if let Some(existing) = blobs.get(code) {
            return Arc::clone(existing);
        }
        let blob: Arc<[u8]> = Arc::from(code);
        blobs.insert(Arc::clone(&blob));
        self.unique_code_bytes.fetch_add(code.len(), Ordering::Relaxed);
        blob
    }

    /// Store a compiled method
    pub fn insert(&self, method: CompiledMethod) -> CompiledMethodHandle {
        let mut methods = self.methods.write();
        methods.push(method);
        CompiledMethodHandle(methods.len() - 1)
    }

    /// Look up a stored method
    pub fn get(&self, handle: CompiledMethodHandle) -> Option<CompiledMethod> {
        self.methods.read().get(handle.0).cloned()
    }

    /// Number of stored methods
    pub fn len(&self) -> usize {
        self.methods.read().len()
    }

    /// Whether nothing has been stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the counters
    pub fn stats(&self) -> StorageStats {
        StorageStats {
            methods: self.len(),
            total_code_bytes: self.total_code_bytes.load(Ordering::Relaxed),
            unique_code_bytes: self.unique_code_bytes.load(Ordering::Relaxed),
        }
    }
}

impl Default for CompiledMethodStorage {
    fn default() -> Self {
        Self::new()
    }
}
