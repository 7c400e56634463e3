use crate::draw::buffer::PixelBuffer;

pub const DEFAULT_MAX_STATES: usize = 50;
pub const DEFAULT_MIN_STATES: usize = 10;
pub const DEFAULT_MAX_MEMORY_BYTES: usize = 100 * 1024 * 1024;
/// Memory pressure never evicts below this many states.
pub const MEMORY_EVICTION_FLOOR: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryConfig {
    pub max_states: usize,
    /// Lower bound for the memory-derived state count.
    pub min_states: usize,
    pub max_memory_bytes: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_states: DEFAULT_MAX_STATES,
            min_states: DEFAULT_MIN_STATES,
            max_memory_bytes: DEFAULT_MAX_MEMORY_BYTES,
        }
    }
}

impl HistoryConfig {
    pub fn sanitized(self) -> Self {
        Self {
            max_states: self.max_states.max(MEMORY_EVICTION_FLOOR),
            min_states: self.min_states.max(MEMORY_EVICTION_FLOOR),
            max_memory_bytes: self.max_memory_bytes,
        }
    }
}

/// An owned full-frame snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryState {
    buffer: PixelBuffer,
    byte_size: usize,
}

impl HistoryState {
    fn new(buffer: PixelBuffer) -> Self {
        let byte_size = buffer.byte_size();
        Self { buffer, byte_size }
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn byte_size(&self) -> usize {
        self.byte_size
    }
}

/// Linear undo/redo timeline of canvas snapshots, bounded by a state count and
/// a memory ceiling.
///
/// Saving after an undo discards the redo branch. When the memory ceiling is
/// smaller than one snapshot the history degrades to keeping two states.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    config: HistoryConfig,
    states: Vec<HistoryState>,
    current_index: Option<usize>,
    memory_usage: usize,
    effective_max_states: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

impl HistoryManager {
    pub fn new(config: HistoryConfig) -> Self {
        let config = config.sanitized();
        Self {
            config,
            states: Vec::new(),
            current_index: None,
            memory_usage: 0,
            effective_max_states: config.max_states,
        }
    }

    pub fn config(&self) -> HistoryConfig {
        self.config
    }

    pub fn save_state(&mut self, snapshot: PixelBuffer) {
        self.prune_redo_branch();

        let state = HistoryState::new(snapshot);
        let size = state.byte_size;

        while self.memory_usage + size > self.config.max_memory_bytes
            && self.states.len() > MEMORY_EVICTION_FLOOR
        {
            self.evict_oldest();
        }

        self.states.push(state);
        self.current_index = Some(self.states.len() - 1);
        self.memory_usage += size;

        self.effective_max_states = effective_max_states(self.config, size);
        if self.states.len() > self.effective_max_states {
            self.evict_oldest();
        }

        tracing::trace!(
            states = self.states.len(),
            memory_usage = self.memory_usage,
            effective_max = self.effective_max_states,
            "history state saved"
        );
    }

    pub fn undo(&mut self) -> Option<&PixelBuffer> {
        if !self.can_undo() {
            return None;
        }
        let index = self.current_index? - 1;
        self.current_index = Some(index);
        Some(&self.states[index].buffer)
    }

    pub fn redo(&mut self) -> Option<&PixelBuffer> {
        if !self.can_redo() {
            return None;
        }
        let index = self.current_index? + 1;
        self.current_index = Some(index);
        Some(&self.states[index].buffer)
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.current_index, Some(index) if index > 0)
    }

    pub fn can_redo(&self) -> bool {
        matches!(self.current_index, Some(index) if index + 1 < self.states.len())
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn current(&self) -> Option<&PixelBuffer> {
        self.current_index.map(|index| &self.states[index].buffer)
    }

    pub fn states(&self) -> &[HistoryState] {
        &self.states
    }

    pub fn memory_usage(&self) -> usize {
        self.memory_usage
    }

    pub fn effective_max_states(&self) -> usize {
        self.effective_max_states
    }

    /// Evicts the oldest states until `min_to_keep` remain, ignoring memory
    /// pressure. The state currently pointed at is never evicted. Returns the
    /// number of states removed.
    pub fn force_cleanup(&mut self, min_to_keep: usize) -> usize {
        let Some(current) = self.current_index else {
            return 0;
        };
        let keep = min_to_keep.max(1);
        let excess = self.states.len().saturating_sub(keep);
        let removed = excess.min(current);
        for _ in 0..removed {
            self.evict_oldest();
        }
        if removed > 0 {
            tracing::debug!(
                removed,
                remaining = self.states.len(),
                memory_usage = self.memory_usage,
                "history cleanup evicted old states"
            );
        }
        removed
    }

    pub fn clear(&mut self) {
        self.states.clear();
        self.current_index = None;
        self.memory_usage = 0;
        self.effective_max_states = self.config.max_states;
    }

    fn prune_redo_branch(&mut self) {
        let Some(current) = self.current_index else {
            return;
        };
        if current + 1 >= self.states.len() {
            return;
        }
        let pruned: usize = self
            .states
            .drain(current + 1..)
            .map(|state| state.byte_size)
            .sum();
        self.memory_usage = self.memory_usage.saturating_sub(pruned);
    }

    fn evict_oldest(&mut self) {
        if self.states.is_empty() {
            return;
        }
        let removed = self.states.remove(0);
        self.memory_usage = self.memory_usage.saturating_sub(removed.byte_size);
        self.current_index = match self.current_index {
            Some(0) | None => None,
            Some(index) => Some(index - 1),
        };
        if self.states.is_empty() {
            self.current_index = None;
        }
        tracing::trace!(bytes = removed.byte_size, "evicted oldest history state");
    }
}

/// `min(max_states, max(min_states, max_memory_bytes / state_size))`.
pub fn effective_max_states(config: HistoryConfig, state_size: usize) -> usize {
    let by_memory = if state_size == 0 {
        usize::MAX
    } else {
        config.max_memory_bytes / state_size
    };
    config.max_states.min(config.min_states.max(by_memory))
}
