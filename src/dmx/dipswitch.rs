//! DIP-switch address conversion
//!
//! Maps a DMX address onto a standard 9-way DIP bank and back. Nine
//! switches express 1-511; an all-OFF bank reads as address 1 because
//! address 0 does not exist on the wire.

use super::constants::{DIP_MAX_ADDRESS, DIP_SWITCH_COUNT, DIP_SWITCH_WEIGHTS};
use serde::{Deserialize, Serialize};

/// Which physical direction means ON for this fixture's bank
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    #[serde(rename = "up")]
    OnUp,
    #[serde(rename = "down")]
    OnDown,
}

/// Whether switch 1 sits on the left or the right of the bank
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum SwitchOrder {
    #[default]
    #[serde(rename = "ltr")]
    LeftToRight,
    #[serde(rename = "rtl")]
    RightToLeft,
}

/// Clamp any numeric input into the representable switch range
pub fn clamp_address(value: u32) -> u16 {
    value.clamp(1, u32::from(DIP_MAX_ADDRESS)) as u16
}

/// Switch states for an address, least significant weight first
pub fn switches_for(address: u16) -> [bool; DIP_SWITCH_COUNT] {
    let address = clamp_address(u32::from(address));
    let mut switches = [false; DIP_SWITCH_COUNT];
    for (switch, weight) in switches.iter_mut().zip(DIP_SWITCH_WEIGHTS) {
        *switch = (address & weight) == weight;
    }
    switches
}

/// Address for a set of switch states
pub fn address_from(switches: &[bool; DIP_SWITCH_COUNT]) -> u16 {
    let mut mask = 0u16;
    for (on, weight) in switches.iter().zip(DIP_SWITCH_WEIGHTS) {
        if *on {
            mask |= weight;
        }
    }
    mask.max(1)
}

/// Switch weights in display order
///
/// The user-facing numbering always reads 1-9 left to right; flipping the
/// bank changes which weight sits under each number, exactly like turning
/// the fixture around.
pub fn bank_weights(order: SwitchOrder) -> [u16; DIP_SWITCH_COUNT] {
    let mut weights = DIP_SWITCH_WEIGHTS;
    if order == SwitchOrder::RightToLeft {
        weights.reverse();
    }
    weights
}

/// Resolve user-facing switch numbers (1-9 in display order) to an address
pub fn address_from_numbers(numbers: &[usize], order: SwitchOrder) -> Option<u16> {
    let weights = bank_weights(order);
    let mut switches = [false; DIP_SWITCH_COUNT];
    for &number in numbers {
        if !(1..=DIP_SWITCH_COUNT).contains(&number) {
            return None;
        }
        let weight = weights[number - 1];
        let bit = DIP_SWITCH_WEIGHTS.iter().position(|w| *w == weight)?;
        switches[bit] = true;
    }
    Some(address_from(&switches))
}

/// Render a switch bank as text
///
/// Three columns per switch: number, the lever position, and the channel
/// weight. The ON row flips with the orientation.
pub fn render_bank(address: u16, orientation: Orientation, order: SwitchOrder) -> String {
    let states = switches_for(address);
    let weights = bank_weights(order);

    let mut numbers = String::from("sw  ");
    let mut on_row = String::from("ON  ");
    let mut off_row = String::from("OFF ");
    let mut weight_row = String::from("ch  ");

    for (index, weight) in weights.iter().enumerate() {
        let bit = DIP_SWITCH_WEIGHTS
            .iter()
            .position(|w| w == weight)
            .unwrap_or(0);
        let on = states[bit];

        numbers.push_str(&format!("{:>4}", index + 1));
        on_row.push_str(if on { "   #" } else { "   ." });
        off_row.push_str(if on { "   ." } else { "   #" });
        weight_row.push_str(&format!("{weight:>4}"));
    }

    let (first, second) = match orientation {
        Orientation::OnUp => (on_row, off_row),
        Orientation::OnDown => (off_row, on_row),
    };

    format!(
        "{numbers}\n{first}\n{second}\n{weight_row}\naddress {}",
        clamp_address(u32::from(address))
    )
}

// 🎚️💡

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switch_states_decompose_the_address() {
        let states = switches_for(37); // 1 + 4 + 32
        let on: Vec<u16> = DIP_SWITCH_WEIGHTS
            .iter()
            .zip(states)
            .filter(|(_, s)| *s)
            .map(|(w, _)| *w)
            .collect();
        assert_eq!(on, vec![1, 4, 32]);
    }

    #[test]
    fn round_trip_over_representable_addresses() {
        for address in [1u16, 2, 7, 64, 255, 256, 333, 511] {
            assert_eq!(address_from(&switches_for(address)), address);
        }
    }

    #[test]
    fn out_of_range_addresses_clamp() {
        assert_eq!(clamp_address(0), 1);
        assert_eq!(clamp_address(512), 511);
        assert_eq!(clamp_address(9000), 511);
        assert_eq!(address_from(&switches_for(511)), 511);
    }

    #[test]
    fn all_off_reads_as_address_one() {
        assert_eq!(address_from(&[false; DIP_SWITCH_COUNT]), 1);
    }

    #[test]
    fn flipped_bank_mirrors_the_weights() {
        let weights = bank_weights(SwitchOrder::RightToLeft);
        assert_eq!(weights[0], 256);
        assert_eq!(weights[8], 1);

        // Switch number 9 on a flipped bank is the weight-1 switch.
        assert_eq!(
            address_from_numbers(&[9], SwitchOrder::RightToLeft),
            Some(1)
        );
        assert_eq!(
            address_from_numbers(&[1, 3], SwitchOrder::LeftToRight),
            Some(5)
        );
        assert_eq!(address_from_numbers(&[10], SwitchOrder::LeftToRight), None);
    }

    #[test]
    fn rendering_marks_on_switches() {
        let text = render_bank(5, Orientation::OnUp, SwitchOrder::LeftToRight);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("sw"));
        assert!(lines[1].starts_with("ON"));
        // weights 1 and 4 are ON
        assert_eq!(lines[1].matches('#').count(), 2);
        assert_eq!(lines[2].matches('#').count(), 7);
        assert!(text.ends_with("address 5"));

        let flipped = render_bank(5, Orientation::OnDown, SwitchOrder::LeftToRight);
        assert!(flipped.lines().nth(1).unwrap().starts_with("OFF"));
    }
}
