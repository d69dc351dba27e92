//! Configuration system for the pipeline simulator.
//!
//! This module defines the configuration structures and enums used to
//! parameterize the simulator. It provides:
//! 1. **Defaults:** Baseline hardware constants (memory sizes, latencies, cache shape).
//! 2. **Structures:** Hierarchical config for general, pipeline, memory, and cache settings.
//! 3. **Enums:** Write scheme and replacement policy selection.
//!
//! Configuration is supplied as JSON (see the CLI's `--config` flag) or via
//! `Config::default()`. Invalid combinations (sizes that are not powers of
//! two, associativity that does not divide the cache size) are rejected with
//! a fatal assertion when the processor is constructed.

use serde::Deserialize;

/// Default configuration constants for the simulator.
mod defaults {
    /// Instruction memory address space in bits (1 KiB = 256 instruction slots).
    pub const INSTRUCTION_SPACE_BITS: usize = 10;

    /// Data memory address space in bits (4 KiB).
    pub const DATA_SPACE_BITS: usize = 12;

    /// Data memory access latency in cycles.
    pub const MEMORY_LATENCY: u64 = 1;

    /// Default cache block size in words.
    pub const CACHE_BLOCK_WORDS: usize = 4;

    /// Default cache associativity (1 = direct-mapped).
    pub const CACHE_SET_SIZE: usize = 1;

    /// Default cache capacity in blocks.
    pub const CACHE_BLOCKS: usize = 8;

    /// Default cache access latency in cycles.
    pub const CACHE_LATENCY: u64 = 1;

    /// Seed for the random replacement policy's pseudo-random source.
    pub const CACHE_RNG_SEED: u64 = 123_456_789;
}

/// Write scheme of the data cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum WriteScheme {
    /// Every write is propagated to the lower memory immediately.
    #[default]
    WriteThrough,
    /// Writes dirty the cached block; lower memory is updated only when a
    /// dirty block is evicted.
    WriteBack,
}

/// Replacement policy used to pick an eviction victim from a full set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum ReplacementPolicy {
    /// Uniformly random victim, from a seeded xorshift generator.
    Random,
    /// True LRU: evict the entry with the smallest last-accessed time.
    #[default]
    #[serde(alias = "LRU")]
    PreciseLru,
    /// Tree-PLRU: `set_size - 1` bits per set, each pointing away from the
    /// most recently used subtree.
    #[serde(alias = "PLRU")]
    ApproximateLru,
}

/// Root configuration structure containing all simulator settings.
///
/// # Examples
///
/// ```
/// use rv32_core::config::Config;
///
/// let config = Config::default();
/// assert!(config.pipeline.forwarding);
/// assert_eq!(config.memory.latency, 1);
/// assert!(!config.cache.enabled);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// General simulation settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Datapath configuration.
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Main memory configuration.
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Data cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// General simulation settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneralConfig {
    /// Emit per-cycle stall, flush, and forwarding trace lines to stderr.
    #[serde(default)]
    pub trace: bool,
}

/// Datapath configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Enable the forwarding unit. When disabled, the hazard unit stalls
    /// conservatively on every read-after-write dependency instead.
    #[serde(default = "PipelineConfig::default_forwarding")]
    pub forwarding: bool,
}

impl PipelineConfig {
    /// Forwarding defaults to on, matching the CLI's `[forwarding]` default.
    fn default_forwarding() -> bool {
        true
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { forwarding: true }
    }
}

/// Main memory configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// Instruction memory address space in bits.
    #[serde(default = "MemoryConfig::default_instruction_space_bits")]
    pub instruction_space_bits: usize,

    /// Data memory address space in bits.
    #[serde(default = "MemoryConfig::default_data_space_bits")]
    pub data_space_bits: usize,

    /// Data memory access latency in cycles (must be at least 1).
    #[serde(default = "MemoryConfig::default_latency")]
    pub latency: u64,
}

impl MemoryConfig {
    /// Returns the default instruction memory address space in bits.
    fn default_instruction_space_bits() -> usize {
        defaults::INSTRUCTION_SPACE_BITS
    }

    /// Returns the default data memory address space in bits.
    fn default_data_space_bits() -> usize {
        defaults::DATA_SPACE_BITS
    }

    /// Returns the default data memory latency in cycles.
    fn default_latency() -> u64 {
        defaults::MEMORY_LATENCY
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            instruction_space_bits: defaults::INSTRUCTION_SPACE_BITS,
            data_space_bits: defaults::DATA_SPACE_BITS,
            latency: defaults::MEMORY_LATENCY,
        }
    }
}

/// Data cache configuration.
///
/// `block_words`, `set_size`, and `blocks` must all be powers of two, and
/// `set_size` must divide `blocks`; violations are fatal at construction.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Interpose a cache between the data memory port and main memory.
    #[serde(default)]
    pub enabled: bool,

    /// Words per cache block.
    #[serde(default = "CacheConfig::default_block_words")]
    pub block_words: usize,

    /// Blocks per set (associativity; 1 = direct-mapped).
    #[serde(default = "CacheConfig::default_set_size")]
    pub set_size: usize,

    /// Total capacity in blocks.
    #[serde(default = "CacheConfig::default_blocks")]
    pub blocks: usize,

    /// Write scheme.
    #[serde(default)]
    pub scheme: WriteScheme,

    /// Replacement policy.
    #[serde(default)]
    pub policy: ReplacementPolicy,

    /// Cache access latency in cycles (must be at least 1).
    #[serde(default = "CacheConfig::default_latency")]
    pub latency: u64,

    /// Seed for the random replacement policy.
    #[serde(default = "CacheConfig::default_rng_seed")]
    pub rng_seed: u64,
}

impl CacheConfig {
    /// Returns the default block size in words.
    fn default_block_words() -> usize {
        defaults::CACHE_BLOCK_WORDS
    }

    /// Returns the default associativity.
    fn default_set_size() -> usize {
        defaults::CACHE_SET_SIZE
    }

    /// Returns the default capacity in blocks.
    fn default_blocks() -> usize {
        defaults::CACHE_BLOCKS
    }

    /// Returns the default cache latency in cycles.
    fn default_latency() -> u64 {
        defaults::CACHE_LATENCY
    }

    /// Returns the default random replacement seed.
    fn default_rng_seed() -> u64 {
        defaults::CACHE_RNG_SEED
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            block_words: defaults::CACHE_BLOCK_WORDS,
            set_size: defaults::CACHE_SET_SIZE,
            blocks: defaults::CACHE_BLOCKS,
            scheme: WriteScheme::default(),
            policy: ReplacementPolicy::default(),
            latency: defaults::CACHE_LATENCY,
            rng_seed: defaults::CACHE_RNG_SEED,
        }
    }
}
