// src/dmx/constants.rs
// Fixed DMX addressing facts that never change

/// Channels in one DMX512 universe
pub const UNIVERSE_SIZE: u16 = 512;

/// Switches on a standard 9-way address DIP bank
pub const DIP_SWITCH_COUNT: usize = 9;

/// Channel weight of each DIP switch, least significant first
pub const DIP_SWITCH_WEIGHTS: [u16; DIP_SWITCH_COUNT] = [1, 2, 4, 8, 16, 32, 64, 128, 256];

/// Highest address a 9-switch bank can express (512 needs a tenth bit)
pub const DIP_MAX_ADDRESS: u16 = 511;
