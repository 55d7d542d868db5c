//! Gap computation along a container's primary axis.
//!
//! [`spacing`] returns `count + 1` gaps for `count` dynamic children:
//! `gaps[0]` before the first child, `gaps[i]` between child `i - 1` and
//! child `i`, `gaps[count]` after the last. The gaps always sum to the slack
//! (`interior - children`), so children plus gaps fill the interior exactly.
//! Slack may be negative when the children overflow.

use crate::types::{AxisPlacement, Distribution};

/// Gaps for one axis.
///
/// `placement` is the container's own alignment on this axis and only
/// matters for [`Distribution::None`].
pub fn spacing(
    distribution: Distribution,
    interior: i32,
    children: i32,
    count: usize,
    placement: AxisPlacement,
) -> Vec<i32> {
    let slack = interior as i64 - children as i64;
    let gaps = match distribution {
        Distribution::EvenSpaced => even_spaced(slack, count),
        Distribution::SpacedToEdge => spaced_to_edge(slack, count),
        Distribution::None => packed(slack, count, placement),
    };
    gaps.into_iter().map(saturate).collect()
}

/// `count + 1` gaps, remainder to the earliest.
fn even_spaced(slack: i64, count: usize) -> Vec<i64> {
    split_evenly(slack, count + 1)
}

/// No outer gaps. With fewer than two children there are no inner gaps
/// either, so the slack is halved around the lone child.
fn spaced_to_edge(slack: i64, count: usize) -> Vec<i64> {
    match count {
        0 => vec![slack],
        1 => vec![slack - slack / 2, slack / 2],
        _ => {
            let mut gaps = Vec::with_capacity(count + 1);
            gaps.push(0);
            gaps.extend(split_evenly(slack, count - 1));
            gaps.push(0);
            gaps
        }
    }
}

/// Children touch; the slack goes to one or both ends.
fn packed(slack: i64, count: usize, placement: AxisPlacement) -> Vec<i64> {
    let mut gaps = vec![0; count + 1];
    let after = match placement {
        AxisPlacement::Start => slack,
        AxisPlacement::Center => slack / 2,
        AxisPlacement::End => 0,
    };
    gaps[count] = after;
    gaps[0] += slack - after;
    gaps
}

fn split_evenly(total: i64, parts: usize) -> Vec<i64> {
    let n = parts as i64;
    let base = total.div_euclid(n);
    let remainder = total.rem_euclid(n) as usize;
    (0..parts).map(|i| base + i64::from(i < remainder)).collect()
}

fn saturate(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
