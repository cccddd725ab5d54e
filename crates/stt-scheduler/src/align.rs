use crate::engine::{DiarizationMap, Interval, TimeMs};

/// Pick the speaker whose turn covers a strict majority of `span`.
///
/// A turn qualifies only when its overlap exceeds half the segment
/// duration. Among qualifiers the largest overlap wins; equal overlaps
/// resolve to the lexicographically smallest tag, so the outcome never
/// depends on the order the diarizer emitted its turns.
#[must_use]
pub fn assign_speaker<'a>(span: Interval, map: &'a DiarizationMap) -> Option<&'a str> {
	let duration = span.duration();
	if duration == 0 {
		return None;
	}

	let mut best_overlap: TimeMs = 0;
	let mut best_tag: Option<&str> = None;

	for turn in &map.turns {
		let overlap = span.overlap(&turn.span);
		if overlap * 2 <= duration {
			continue;
		}

		let tag = turn.speaker.as_str();
		let better = match best_tag {
			None => true,
			Some(current) => overlap > best_overlap || (overlap == best_overlap && tag < current),
		};
		if better {
			best_overlap = overlap;
			best_tag = Some(tag);
		}
	}

	best_tag
}

/// Render a raw diarizer tag as a short display label.
///
/// `SPEAKER_00`-style tags (and bare ordinals) map to letters: 0 is
/// "A", 25 is "Z", 26 continues "AA". Non-numeric tags pass through
/// unchanged.
#[must_use]
pub fn display_label(tag: &str) -> String {
	let ordinal = tag.strip_prefix("SPEAKER_").unwrap_or(tag);
	match ordinal.parse::<u32>() {
		Ok(index) => letters(index),
		Err(_) => tag.to_string(),
	}
}

/// Bijective base-26 rendering, 0-based.
fn letters(index: u32) -> String {
	let mut value = u64::from(index) + 1;
	let mut out = String::new();
	while value > 0 {
		value -= 1;
		out.push(char::from(b'A' + (value % 26) as u8));
		value /= 26;
	}
	out.chars().rev().collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::engine::SpeakerTurn;

	fn two_turns(split: TimeMs) -> DiarizationMap {
		DiarizationMap::new(vec![SpeakerTurn::new(0, split, "SPEAKER_00"), SpeakerTurn::new(split, 4000, "SPEAKER_01")])
	}

	#[test]
	fn exact_half_overlap_is_not_a_majority() {
		// 1000ms in each turn, 50% each: nobody clears the bar.
		let map = two_turns(2000);
		assert_eq!(assign_speaker(Interval::new(1000, 3000), &map), None);
	}

	#[test]
	fn strict_majority_wins() {
		// 1200ms of 2000ms (60%) falls in the first turn.
		let map = two_turns(2200);
		assert_eq!(assign_speaker(Interval::new(1000, 3000), &map), Some("SPEAKER_00"));
	}

	#[test]
	fn fully_covered_segment_takes_its_turn() {
		let map = two_turns(2000);
		assert_eq!(assign_speaker(Interval::new(100, 900), &map), Some("SPEAKER_00"));
		assert_eq!(assign_speaker(Interval::new(2500, 3500), &map), Some("SPEAKER_01"));
	}

	#[test]
	fn equal_overlaps_resolve_to_smallest_tag() {
		// Both turns cover the whole segment; the tie must not depend on
		// emission order.
		let forward = DiarizationMap::new(vec![SpeakerTurn::new(0, 4000, "SPEAKER_00"), SpeakerTurn::new(0, 4000, "SPEAKER_01")]);
		let reversed = DiarizationMap::new(vec![SpeakerTurn::new(0, 4000, "SPEAKER_01"), SpeakerTurn::new(0, 4000, "SPEAKER_00")]);

		assert_eq!(assign_speaker(Interval::new(1000, 2000), &forward), Some("SPEAKER_00"));
		assert_eq!(assign_speaker(Interval::new(1000, 2000), &reversed), Some("SPEAKER_00"));
	}

	#[test]
	fn degenerate_inputs_stay_unlabeled() {
		let map = two_turns(2000);
		assert_eq!(assign_speaker(Interval::new(1500, 1500), &map), None);
		assert_eq!(assign_speaker(Interval::new(1000, 3000), &DiarizationMap::default()), None);
	}

	#[test]
	fn labels_follow_the_alphabet() {
		assert_eq!(display_label("SPEAKER_00"), "A");
		assert_eq!(display_label("SPEAKER_01"), "B");
		assert_eq!(display_label("25"), "Z");
		assert_eq!(display_label("26"), "AA");
		assert_eq!(display_label("SPEAKER_27"), "AB");
	}

	#[test]
	fn non_numeric_tags_pass_through() {
		assert_eq!(display_label("alice"), "alice");
		assert_eq!(display_label("SPEAKER_guest"), "SPEAKER_guest");
	}
}
