//! Roster builders used across encoder and solver tests.

use rosterforge_core::{
    Employee, EmployeeId, Horizon, Roster, Shift, ShiftId, TimeSpan,
};

/// A nurse with the given id, always available, no limits.
pub fn nurse(id: u32) -> Employee {
    Employee::new(EmployeeId(id), format!("nurse-{id}"), ["nurse"])
}

/// A standard 08:00-16:00 day shift for nurses.
pub fn day_shift(id: u32, day: i64, headcount: u32) -> Shift {
    let start = day * 1440 + 480;
    Shift::new(ShiftId(id), TimeSpan::new(start, start + 480), "nurse", headcount)
}

/// One day, one shift needing `headcount` nurses, `n_employees`
/// qualified nurses. The worked example from the engine's contract
/// uses (3, 2).
pub fn single_shift_roster(n_employees: u32, headcount: u32) -> Roster {
    Roster::new(
        Horizon::days(1),
        (0..n_employees).map(nurse).collect(),
        vec![day_shift(0, 0, headcount)],
        vec![],
    )
    .expect("fixture roster is valid")
}

/// Two employees with different skills and availability against a
/// nurse shift and a clerk shift on one day.
pub fn mixed_skill_roster() -> Roster {
    let nurse_half_day = Employee::new(EmployeeId(0), "nurse-am", ["nurse"])
        .with_availability(vec![TimeSpan::new(0, 720)]);
    let clerk = Employee::new(EmployeeId(1), "clerk", ["clerk"]);
    let nurse_full = nurse(2);
    Roster::new(
        Horizon::days(1),
        vec![nurse_half_day, clerk, nurse_full],
        vec![
            Shift::new(ShiftId(0), TimeSpan::new(480, 960), "nurse", 1),
            Shift::new(ShiftId(1), TimeSpan::new(540, 1020), "clerk", 1),
        ],
        vec![],
    )
    .expect("fixture roster is valid")
}

/// Two nurses against two shifts whose spans overlap.
pub fn overlapping_shifts_roster() -> Roster {
    Roster::new(
        Horizon::days(1),
        vec![nurse(0), nurse(1)],
        vec![
            Shift::new(ShiftId(0), TimeSpan::new(480, 960), "nurse", 1),
            Shift::new(ShiftId(1), TimeSpan::new(720, 1200), "nurse", 1),
        ],
        vec![],
    )
    .expect("fixture roster is valid")
}

/// Two nurses needing `min_rest_mins` of rest against two shifts with
/// only a 240-minute gap between them.
pub fn short_rest_roster(min_rest_mins: i64) -> Roster {
    let employees = vec![
        nurse(0).with_min_rest_mins(min_rest_mins),
        nurse(1).with_min_rest_mins(min_rest_mins),
    ];
    Roster::new(
        Horizon::days(1),
        employees,
        vec![
            Shift::new(ShiftId(0), TimeSpan::new(0, 480), "nurse", 1),
            Shift::new(ShiftId(1), TimeSpan::new(720, 1200), "nurse", 1),
        ],
        vec![],
    )
    .expect("fixture roster is valid")
}

/// One nurse capped at `max_minutes`, against `n_shifts` disjoint
/// 480-minute day shifts on consecutive days.
pub fn capped_hours_roster(max_minutes: i64, n_shifts: u32) -> Roster {
    Roster::new(
        Horizon::days(n_shifts as i64),
        vec![nurse(0).with_max_minutes(max_minutes)],
        (0..n_shifts)
            .map(|i| day_shift(i, i as i64, 1))
            .collect(),
        vec![],
    )
    .expect("fixture roster is valid")
}

/// A week-long roster: `n_shifts` day shifts spread over seven days
/// (several per day once `n_shifts` exceeds seven) and `n_employees`
/// nurses requiring an hour of rest between shifts.
pub fn week_roster(n_employees: u32, n_shifts: u32) -> Roster {
    let employees = (0..n_employees)
        .map(|i| nurse(i).with_min_rest_mins(60))
        .collect();
    let shifts = (0..n_shifts)
        .map(|i| day_shift(i, (i % 7) as i64, 1))
        .collect();
    Roster::new(Horizon::days(7), employees, shifts, vec![])
        .expect("fixture roster is valid")
}
