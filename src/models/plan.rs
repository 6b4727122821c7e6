//! The fixed weekly training plan.
//!
//! Reference data compiled into the binary. Practice sessions copy a day's
//! routine into a [`RoutineItem`] snapshot, so history never depends on this
//! table staying the same.

use chrono::Weekday;

use super::RoutineItem;

/// What a given weekday looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayPlan {
    pub day: Weekday,
    pub goals: &'static str,
    pub routine: &'static [&'static str],
}

/// Plan days in week order, Monday first.
pub const WEEKLY_PLAN: [DayPlan; 7] = [
    DayPlan {
        day: Weekday::Mon,
        goals: "Short-approach technique: plant timing and takeoff position",
        routine: &[
            "Dynamic warm-up and drills (A-skips, B-skips, high knees)",
            "Pole runs x6",
            "Sand pit plants x8",
            "Short-run jumps (4-6 steps) x10",
            "Core circuit",
        ],
    },
    DayPlan {
        day: Weekday::Tue,
        goals: "Speed and acceleration",
        routine: &[
            "Dynamic warm-up",
            "Block starts 4x20m",
            "Flying 30m x4",
            "Bounding 3x30m",
            "Stretch and roll out",
        ],
    },
    DayPlan {
        day: Weekday::Wed,
        goals: "Full-approach vaulting at mid bar",
        routine: &[
            "Dynamic warm-up and drills",
            "Approach runs with mark check x4",
            "Full-approach jumps x8",
            "Swing-up and turn drills on rope",
        ],
    },
    DayPlan {
        day: Weekday::Thu,
        goals: "Strength and gymnastics",
        routine: &[
            "Warm-up",
            "Power cleans 4x3",
            "Back squats 4x5",
            "Pull-ups 3x8",
            "Rings: inverts and L-holds",
        ],
    },
    DayPlan {
        day: Weekday::Fri,
        goals: "Sharpen: light volume, fast pole",
        routine: &[
            "Dynamic warm-up",
            "Approach runs x3",
            "Short-run jumps x6",
            "Strides 4x60m",
        ],
    },
    DayPlan {
        day: Weekday::Sat,
        goals: "Competition or full-approach session",
        routine: &[
            "Meet warm-up routine",
            "Check marks on runway",
            "Compete or full-approach jumps x6",
            "Cool-down",
        ],
    },
    DayPlan {
        day: Weekday::Sun,
        goals: "Recovery",
        routine: &["Easy walk or swim", "Mobility and stretching"],
    },
];

/// The plan for a weekday.
pub fn day_plan(day: Weekday) -> &'static DayPlan {
    &WEEKLY_PLAN[day.num_days_from_monday() as usize]
}

/// Full English name of a weekday, used as the practice day label.
pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Parse a weekday from a full or abbreviated name.
pub fn parse_day(s: &str) -> Option<Weekday> {
    s.trim().parse::<Weekday>().ok()
}

/// Snapshot a day's routine, marking the given zero-based items as done.
///
/// Indices past the end of the routine are ignored.
pub fn routine_snapshot(day: Weekday, done: &[usize]) -> Vec<RoutineItem> {
    day_plan(day)
        .routine
        .iter()
        .enumerate()
        .map(|(i, text)| RoutineItem {
            text: text.to_string(),
            done: done.contains(&i),
        })
        .collect()
}
