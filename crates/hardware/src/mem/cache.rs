//! Set-associative timed cache.
//!
//! The cache sits between the data memory port and a lower `TimedMemory`.
//! It models its own access latency and, on a miss, the additional cycles of
//! the chained lower-memory transactions (victim write-back, block fill).
//! Supported shapes:
//! 1. **Write schemes:** write-through and write-back (allocate on write).
//! 2. **Replacement:** seeded random, precise LRU (per-entry timestamps),
//!    and approximate LRU (tree-PLRU, `set_size - 1` bits per set).
//!
//! Address split: `| tag | set_index | block_word | byte(2) |`.

use std::cell::RefCell;
use std::rc::Rc;

use crate::common::bits::{is_aligned, nbytes};
use crate::common::Block;
use crate::config::{ReplacementPolicy, WriteScheme};
use crate::mem::{MemoryState, TimedMemory};

/// One cache entry: a tag-identified block with bookkeeping bits.
#[derive(Clone)]
struct CacheEntry {
    valid: bool,
    /// Meaningful only under write-back.
    dirty: bool,
    tag: u32,
    block: Block,
    /// Meaningful only under precise LRU.
    last_accessed_time: u64,
}

/// Progress of an in-flight read transaction.
struct ReadAccess {
    addr: u32,
    nwords: usize,
    elapsed: u64,
    phase: ReadPhase,
}

#[derive(Clone, Copy)]
enum ReadPhase {
    /// Burning the cache's own latency; lookup happens when it expires.
    Latency,
    /// Writing a dirty victim's block back to the lower memory.
    WritebackVictim { entry: usize, victim_addr: u32 },
    /// Reading the containing block from the lower memory.
    Fill { entry: usize },
    /// Block present; extract the requested words next cycle.
    Deliver { entry: usize },
}

/// Progress of an in-flight write transaction.
struct WriteAccess {
    addr: u32,
    block: Block,
    elapsed: u64,
    phase: WritePhase,
}

enum WritePhase {
    /// Burning the cache's own latency; lookup happens when it expires.
    Latency,
    /// Write-back allocate-on-write: a nested read of the containing block.
    Fill(ReadAccess),
    /// Update the matching entry (if any).
    Commit,
    /// Write-through: pushing the write to the lower memory.
    WriteLower,
}

/// A set-associative cache chained to a lower timed memory.
pub struct TimedCache {
    /// Words per block.
    pub block_words: usize,
    /// Blocks per set (associativity).
    pub set_size: usize,
    /// Total blocks in the cache.
    pub cache_blocks: usize,
    /// Write scheme.
    pub scheme: WriteScheme,
    /// Replacement policy.
    pub policy: ReplacementPolicy,
    /// Cache access latency in cycles.
    pub latency: u64,
    entries: Vec<CacheEntry>,
    lower: Rc<RefCell<dyn TimedMemory>>,
    /// Tree-PLRU bits, `set_size - 1` per set.
    lru_bits: Vec<Vec<bool>>,
    /// Monotonic access counter for precise LRU.
    access_clock: u64,
    /// Xorshift state for the random policy; seeded so runs are repeatable.
    rng_state: u64,
    state: MemoryState,
    read_access: Option<ReadAccess>,
    write_access: Option<WriteAccess>,
}

impl TimedCache {
    /// Creates a cold cache in front of `lower`.
    ///
    /// # Arguments
    ///
    /// * `block_words` - Words per block (power of two).
    /// * `set_size` - Blocks per set (power of two dividing `cache_blocks`).
    /// * `cache_blocks` - Total capacity in blocks (power of two).
    /// * `scheme` - Write-through or write-back.
    /// * `policy` - Victim selection policy.
    /// * `lower` - The chained lower memory.
    /// * `latency` - The cache's own latency in cycles (at least 1).
    /// * `rng_seed` - Seed for the random policy (nonzero).
    ///
    /// # Panics
    ///
    /// Panics on any shape violation; configuration errors are fatal at
    /// construction.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        block_words: usize,
        set_size: usize,
        cache_blocks: usize,
        scheme: WriteScheme,
        policy: ReplacementPolicy,
        lower: Rc<RefCell<dyn TimedMemory>>,
        latency: u64,
        rng_seed: u64,
    ) -> Self {
        assert!(block_words.is_power_of_two(), "block size must be a power of two");
        assert!(set_size.is_power_of_two(), "set size must be a power of two");
        assert!(cache_blocks.is_power_of_two(), "cache size must be a power of two");
        assert!(
            cache_blocks % set_size == 0 && set_size <= cache_blocks,
            "set size must divide the cache size"
        );
        assert!(latency >= 1, "cache latency must be at least one cycle");
        assert!(rng_seed != 0, "xorshift seed must be nonzero");

        let set_count = cache_blocks / set_size;
        TimedCache {
            block_words,
            set_size,
            cache_blocks,
            scheme,
            policy,
            latency,
            entries: vec![
                CacheEntry {
                    valid: false,
                    dirty: false,
                    tag: 0,
                    block: Block::new(block_words),
                    last_accessed_time: 0,
                };
                cache_blocks
            ],
            lower,
            lru_bits: vec![vec![false; set_size - 1]; set_count],
            access_clock: 0,
            rng_state: rng_seed,
            state: MemoryState::Ready,
            read_access: None,
            write_access: None,
        }
    }

    /// The chained lower memory.
    pub fn lower(&self) -> Rc<RefCell<dyn TimedMemory>> {
        Rc::clone(&self.lower)
    }

    // Address split. `byte` is the low 2 bits; the rest as documented above.

    fn block_bit_count(&self) -> u32 {
        self.block_words.trailing_zeros()
    }

    fn set_bit_count(&self) -> u32 {
        self.set_size.trailing_zeros()
    }

    fn index_bit_count(&self) -> u32 {
        self.cache_blocks.trailing_zeros() - self.set_bit_count()
    }

    fn tag_of(&self, addr: u32) -> u32 {
        addr >> (self.index_bit_count() + self.block_bit_count() + 2)
    }

    fn set_index_of(&self, addr: u32) -> usize {
        ((addr >> (self.block_bit_count() + 2)) & ((1 << self.index_bit_count()) - 1)) as usize
    }

    /// Byte address of the first word of the block held by `entry`.
    fn entry_addr(&self, entry: usize) -> u32 {
        let index = (entry / self.set_size) as u32;
        let index_offset = self.block_bit_count() + 2;
        let tag_offset = index_offset + self.index_bit_count();
        (self.entries[entry].tag << tag_offset) | (index << index_offset)
    }

    /// Finds the valid entry holding `addr`'s block, if any.
    fn find_entry(&self, addr: u32) -> Option<usize> {
        let tag = self.tag_of(addr);
        let start = self.set_index_of(addr) * self.set_size;
        (start..start + self.set_size)
            .find(|&i| self.entries[i].valid && self.entries[i].tag == tag)
    }

    /// Picks the eviction victim in a full set, per the active policy.
    fn select_victim(&mut self, set_idx: usize) -> usize {
        let start = set_idx * self.set_size;
        match self.policy {
            ReplacementPolicy::PreciseLru => (start..start + self.set_size)
                .min_by_key(|&i| self.entries[i].last_accessed_time)
                .expect("sets are never empty"),
            ReplacementPolicy::ApproximateLru => {
                // Descend the tree against the pointed-to (recently used)
                // subtree at every level.
                let mut local = 0usize;
                let mut lru_bit = 0usize;
                for _ in 0..self.set_bit_count() {
                    let choice = !self.lru_bits[set_idx][lru_bit];
                    local = (local << 1) | choice as usize;
                    lru_bit = 2 * lru_bit + 1 + choice as usize;
                }
                start + local
            }
            ReplacementPolicy::Random => start + self.next_rand() as usize % self.set_size,
        }
    }

    /// Records an access to `entry` for the active replacement policy.
    fn update_lru(&mut self, entry: usize, addr: u32) {
        match self.policy {
            ReplacementPolicy::PreciseLru => {
                self.access_clock += 1;
                self.entries[entry].last_accessed_time = self.access_clock;
            }
            ReplacementPolicy::ApproximateLru => {
                // Each level's bit records which subtree was used most
                // recently, iterating from the most significant index bit.
                let set_idx = self.set_index_of(addr);
                let local = entry % self.set_size;
                let mut lru_bit = 0usize;
                for bit in (0..self.set_bit_count()).rev() {
                    let used_right = (local >> bit) & 1 == 1;
                    self.lru_bits[set_idx][lru_bit] = used_right;
                    lru_bit = 2 * lru_bit + 1 + used_right as usize;
                }
            }
            ReplacementPolicy::Random => {}
        }
    }

    fn next_rand(&mut self) -> u64 {
        let mut x = self.rng_state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.rng_state = x;
        x
    }

    /// Byte address of the start of the block containing `addr`.
    fn block_base(&self, addr: u32) -> u32 {
        addr / nbytes(self.block_words) as u32 * nbytes(self.block_words) as u32
    }

    /// Advances a read transaction by one cycle.
    fn step_read(&mut self, access: &mut ReadAccess) -> Option<Block> {
        loop {
            match access.phase {
                ReadPhase::Latency => {
                    access.elapsed += 1;
                    if access.elapsed < self.latency {
                        return None;
                    }
                    if let Some(entry) = self.find_entry(access.addr) {
                        // Hit: deliver on this same cycle.
                        access.phase = ReadPhase::Deliver { entry };
                        continue;
                    }
                    let set_idx = self.set_index_of(access.addr);
                    let start = set_idx * self.set_size;
                    let free = (start..start + self.set_size).find(|&i| !self.entries[i].valid);
                    let entry = match free {
                        Some(free) => free,
                        None => {
                            let victim = self.select_victim(set_idx);
                            if self.scheme == WriteScheme::WriteBack
                                && self.entries[victim].dirty
                            {
                                access.phase = ReadPhase::WritebackVictim {
                                    entry: victim,
                                    victim_addr: self.entry_addr(victim),
                                };
                                continue;
                            }
                            victim
                        }
                    };
                    access.phase = ReadPhase::Fill { entry };
                    continue;
                }
                ReadPhase::WritebackVictim { entry, victim_addr } => {
                    let block = self.entries[entry].block.clone();
                    if !self.lower.borrow_mut().write_block(victim_addr, &block) {
                        return None;
                    }
                    // The fill starts on the cycle the write-back completes.
                    access.phase = ReadPhase::Fill { entry };
                    continue;
                }
                ReadPhase::Fill { entry } => {
                    let base = self.block_base(access.addr);
                    if let Some(block) =
                        self.lower.borrow_mut().read_block(base, self.block_words)
                    {
                        let tag = self.tag_of(access.addr);
                        let slot = &mut self.entries[entry];
                        slot.valid = true;
                        slot.dirty = false;
                        slot.tag = tag;
                        slot.block.copy_from(&block);
                        access.phase = ReadPhase::Deliver { entry };
                    }
                    // The lower-memory handoff costs this cycle either way.
                    return None;
                }
                ReadPhase::Deliver { entry } => {
                    let word_offset = (access.addr as usize % nbytes(self.block_words)) >> 2;
                    let requested = self.entries[entry].block.subblock(word_offset, access.nwords);
                    self.update_lru(entry, access.addr);
                    return Some(requested);
                }
            }
        }
    }

    /// Advances a write transaction by one cycle.
    fn step_write(&mut self, access: &mut WriteAccess) -> bool {
        loop {
            match &mut access.phase {
                WritePhase::Latency => {
                    access.elapsed += 1;
                    if access.elapsed < self.latency {
                        return false;
                    }
                    let hit = self.find_entry(access.addr).is_some();
                    if self.scheme == WriteScheme::WriteBack && !hit {
                        // Allocate on write: pull the containing block in
                        // through the regular read path (including its own
                        // latency), then overwrite.
                        access.phase = WritePhase::Fill(ReadAccess {
                            addr: self.block_base(access.addr),
                            nwords: self.block_words,
                            elapsed: 0,
                            phase: ReadPhase::Latency,
                        });
                        continue;
                    }
                    access.phase = WritePhase::Commit;
                    continue;
                }
                WritePhase::Fill(read) => {
                    let mut read = std::mem::replace(
                        read,
                        ReadAccess {
                            addr: 0,
                            nwords: 0,
                            elapsed: 0,
                            phase: ReadPhase::Latency,
                        },
                    );
                    let filled = self.step_read(&mut read).is_some();
                    access.phase = if filled {
                        WritePhase::Commit
                    } else {
                        WritePhase::Fill(read)
                    };
                    if !filled {
                        return false;
                    }
                    continue;
                }
                WritePhase::Commit => {
                    if let Some(entry) = self.find_entry(access.addr) {
                        let word_offset =
                            (access.addr as usize % nbytes(self.block_words)) >> 2;
                        self.entries[entry].block.set_subblock(word_offset, &access.block);
                        if self.scheme == WriteScheme::WriteBack {
                            self.entries[entry].dirty = true;
                        }
                        self.update_lru(entry, access.addr);
                    }
                    if self.scheme == WriteScheme::WriteThrough {
                        access.phase = WritePhase::WriteLower;
                        continue;
                    }
                    return true;
                }
                WritePhase::WriteLower => {
                    return self.lower.borrow_mut().write_block(access.addr, &access.block);
                }
            }
        }
    }
}

impl TimedMemory for TimedCache {
    fn read_block(&mut self, addr: u32, nwords: usize) -> Option<Block> {
        assert!(
            self.state != MemoryState::Writing,
            "read issued while a write is in progress"
        );
        if self.state == MemoryState::Ready {
            assert!(
                self.block_words % nwords == 0,
                "requested length must divide the block size"
            );
            assert!(
                is_aligned(addr, nwords),
                "address {:#x} is not aligned to {} words",
                addr,
                nwords
            );
            self.state = MemoryState::Reading;
            self.read_access = Some(ReadAccess {
                addr,
                nwords,
                elapsed: 0,
                phase: ReadPhase::Latency,
            });
        }
        let access = self.read_access.as_ref().expect("reading state implies an access");
        assert!(
            access.addr == addr && access.nwords == nwords,
            "a read in progress must be continued with the same address and length"
        );
        let mut access = self.read_access.take().expect("checked above");
        let result = self.step_read(&mut access);
        if result.is_some() {
            self.state = MemoryState::Ready;
        } else {
            self.read_access = Some(access);
        }
        result
    }

    fn write_block(&mut self, addr: u32, block: &Block) -> bool {
        assert!(
            self.state != MemoryState::Reading,
            "write issued while a read is in progress"
        );
        if self.state == MemoryState::Ready {
            assert!(
                self.block_words % block.len() == 0,
                "written length must divide the block size"
            );
            assert!(
                is_aligned(addr, block.len()),
                "address {:#x} is not aligned to {} words",
                addr,
                block.len()
            );
            self.state = MemoryState::Writing;
            self.write_access = Some(WriteAccess {
                addr,
                block: block.clone(),
                elapsed: 0,
                phase: WritePhase::Latency,
            });
        }
        let access = self.write_access.as_ref().expect("writing state implies an access");
        assert!(
            access.addr == addr && access.block == *block,
            "a write in progress must be continued with the same address and block"
        );
        let mut access = self.write_access.take().expect("checked above");
        let done = self.step_write(&mut access);
        if done {
            self.state = MemoryState::Ready;
        } else {
            self.write_access = Some(access);
        }
        done
    }

    fn state(&self) -> MemoryState {
        self.state
    }
}
