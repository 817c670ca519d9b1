//! Dice expressions `NdS[+/-K]`: parsing, averages and retargeting.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::data::profile::round_half_up;

static DICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)d(\d+)(?:\s*([+-])\s*(\d+))?").expect("valid regex")
});

/// Die sizes tried when synthesizing damage, smallest first.
pub const DIE_SIZES: [u32; 5] = [4, 6, 8, 10, 12];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiceExpr {
    pub num_dice: u32,
    pub die_size: u32,
    pub modifier: i32,
}

impl DiceExpr {
    pub fn new(num_dice: u32, die_size: u32, modifier: i32) -> Self {
        Self {
            num_dice,
            die_size,
            modifier,
        }
    }

    /// Expected value of one die.
    pub fn average_per_die(&self) -> f64 {
        (f64::from(self.die_size) + 1.0) / 2.0
    }

    /// `num_dice * (die_size + 1) / 2 + modifier`.
    pub fn average(&self) -> f64 {
        f64::from(self.num_dice) * self.average_per_die() + f64::from(self.modifier)
    }
}

impl fmt::Display for DiceExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.num_dice, self.die_size)?;
        match self.modifier {
            0 => Ok(()),
            m if m > 0 => write!(f, "+{m}"),
            m => write!(f, "{m}"),
        }
    }
}

/// First dice expression in `expr`. None for anything without `NdS` or with numbers too large.
pub fn parse_dice(expr: &str) -> Option<DiceExpr> {
    let caps = DICE_RE.captures(expr)?;
    let num_dice = caps[1].parse().ok()?;
    let die_size = caps[2].parse().ok()?;
    let modifier = match (caps.get(3), caps.get(4)) {
        (Some(sign), Some(value)) => {
            let value: i32 = value.as_str().parse().ok()?;
            if sign.as_str() == "-" {
                -value
            } else {
                value
            }
        }
        _ => 0,
    };
    Some(DiceExpr::new(num_dice, die_size, modifier))
}

/// Average of a dice expression, or None when it cannot be parsed.
pub fn dice_average(expr: &str) -> Option<f64> {
    parse_dice(expr).map(|dice| dice.average())
}

fn dice_count(value: f64) -> u32 {
    round_half_up(value).max(1.0) as u32
}

/// Fresh dice averaging close to `target`: the smallest die size whose rounded count lands within
/// half a die of the target, else plain d6s.
pub fn scale_to_target(target: f64) -> DiceExpr {
    for die_size in DIE_SIZES {
        let per_die = (f64::from(die_size) + 1.0) / 2.0;
        let num_dice = dice_count(target / per_die);
        let achieved = f64::from(num_dice) * per_die;
        if (achieved - target).abs() <= per_die / 2.0 {
            return DiceExpr::new(num_dice, die_size, 0);
        }
    }
    DiceExpr::new(dice_count(target / 3.5), 6, 0)
}

/// Keep the die size of `dice` and retarget its average by `factor`.
///
/// The achieved average is the target snapped to the grid reachable with this die (halves for even
/// sizes, whole numbers for odd ones), so it never falls as `factor` grows. The dice count is the
/// estimate nearest the target that lands on that grid with the smallest flat modifier.
pub fn scale_existing(dice: &DiceExpr, factor: f64) -> DiceExpr {
    let per_die = dice.average_per_die();
    let target = dice.average() * factor;
    let step = if dice.die_size % 2 == 0 { 0.5 } else { 1.0 };
    let achieved = (round_half_up(target / step) * step).max(step);

    let estimate = dice_count((target - f64::from(dice.modifier)) / per_die);
    [estimate, estimate - 1, estimate.saturating_add(1)]
        .into_iter()
        .filter(|&num_dice| num_dice >= 1)
        .filter_map(|num_dice| {
            let modifier = achieved - f64::from(num_dice) * per_die;
            (modifier.fract() == 0.0).then(|| DiceExpr::new(num_dice, dice.die_size, modifier as i32))
        })
        .min_by_key(|candidate| candidate.modifier.unsigned_abs())
        .unwrap_or_else(|| DiceExpr::new(estimate, dice.die_size, 0))
}
