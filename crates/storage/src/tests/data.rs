use chrono::{DateTime, TimeZone, Utc};
use coach_domain as domain;

pub static USERS: std::sync::LazyLock<Vec<domain::User>> =
    std::sync::LazyLock::new(|| vec![USER.clone(), USER_2.clone(), USER_3.clone()]);

pub static USER: std::sync::LazyLock<domain::User> = std::sync::LazyLock::new(|| domain::User {
    id: 41.into(),
    name: "Alice".to_string(),
    email: "alice@example.org".to_string(),
    active_subscriptions: vec!["Premium".to_string()],
});

pub static USER_2: std::sync::LazyLock<domain::User> = std::sync::LazyLock::new(|| domain::User {
    id: 42.into(),
    name: "Bob".to_string(),
    email: "bob@example.org".to_string(),
    active_subscriptions: vec!["Basic".to_string()],
});

pub static USER_3: std::sync::LazyLock<domain::User> = std::sync::LazyLock::new(|| domain::User {
    id: 43.into(),
    name: "Carol".to_string(),
    email: "carol@example.org".to_string(),
    active_subscriptions: vec![],
});

pub static EXERCISES: std::sync::LazyLock<Vec<domain::Exercise>> =
    std::sync::LazyLock::new(|| vec![EXERCISE.clone(), EXERCISE_2.clone(), EXERCISE_3.clone()]);

pub static EXERCISE: std::sync::LazyLock<domain::Exercise> =
    std::sync::LazyLock::new(|| domain::Exercise {
        id: 1.into(),
        title: domain::Name::new("Bench Press").unwrap(),
        muscle_group: domain::MuscleGroup::Chest,
        description: "Barbell on a flat bench".to_string(),
        video: None,
        duration: None,
    });

pub static EXERCISE_2: std::sync::LazyLock<domain::Exercise> =
    std::sync::LazyLock::new(|| domain::Exercise {
        id: 2.into(),
        title: domain::Name::new("Pull Up").unwrap(),
        muscle_group: domain::MuscleGroup::Back,
        description: String::new(),
        video: Some(51.into()),
        duration: None,
    });

pub static EXERCISE_3: std::sync::LazyLock<domain::Exercise> =
    std::sync::LazyLock::new(|| domain::Exercise {
        id: 3.into(),
        title: domain::Name::new("Plank").unwrap(),
        muscle_group: domain::MuscleGroup::Core,
        description: String::new(),
        video: None,
        duration: Some(domain::Time::new(60).unwrap()),
    });

pub static CREATED_AT: std::sync::LazyLock<DateTime<Utc>> =
    std::sync::LazyLock::new(|| Utc.with_ymd_and_hms(2020, 2, 2, 10, 0, 0).unwrap());

pub static PROGRAM: std::sync::LazyLock<domain::Program> =
    std::sync::LazyLock::new(|| domain::Program {
        id: 1.into(),
        title: domain::Name::new("Strength Block").unwrap(),
        description: "Four days per week".to_string(),
        program_type: domain::ProgramType::Strength,
        created_at: *CREATED_AT,
        updated_at: *CREATED_AT,
    });

pub static PROGRAM_2: std::sync::LazyLock<domain::Program> =
    std::sync::LazyLock::new(|| domain::Program {
        id: 2.into(),
        title: domain::Name::new("Mobility").unwrap(),
        description: String::new(),
        program_type: domain::ProgramType::Mobility,
        created_at: *CREATED_AT,
        updated_at: *CREATED_AT,
    });

/// Two weeks. The first week contains a superset on Monday and a single exercise on
/// Thursday, the second week a single exercise on Monday.
pub static PROGRAM_TREE: std::sync::LazyLock<domain::ProgramTree> =
    std::sync::LazyLock::new(|| domain::ProgramTree {
        program: PROGRAM.clone(),
        weeks: vec![
            domain::WeekTree {
                week: week(11, 1),
                days: vec![
                    domain::DayTree {
                        day: day(21, 11, 1, "Push"),
                        exercises: vec![
                            workout_exercise(31, 21, 1, 1, Some(32)),
                            workout_exercise(32, 21, 2, 2, None),
                            workout_exercise(33, 21, 3, 3, None),
                        ],
                    },
                    domain::DayTree {
                        day: day(22, 11, 4, "Pull"),
                        exercises: vec![workout_exercise(34, 22, 2, 1, None)],
                    },
                ],
            },
            domain::WeekTree {
                week: week(12, 2),
                days: vec![domain::DayTree {
                    day: day(23, 12, 1, "Legs"),
                    exercises: vec![workout_exercise(35, 23, 3, 1, None)],
                }],
            },
        ],
    });

pub static PROGRAM_TREE_2: std::sync::LazyLock<domain::ProgramTree> =
    std::sync::LazyLock::new(|| domain::ProgramTree {
        program: PROGRAM_2.clone(),
        weeks: vec![],
    });

pub static ASSIGNMENT: std::sync::LazyLock<domain::Assignment> =
    std::sync::LazyLock::new(|| domain::Assignment {
        id: 61.into(),
        program_id: PROGRAM.id,
        user_id: USER.id,
        completed: false,
        completed_at: None,
        expires_at: None,
        created_at: *CREATED_AT,
        updated_at: *CREATED_AT,
    });

fn week(id: u128, order: u32) -> domain::Week {
    domain::Week {
        id: id.into(),
        program_id: PROGRAM.id,
        order: domain::WeekOrder::new(order).unwrap(),
    }
}

fn day(id: u128, week_id: u128, day_of_week: u8, title: &str) -> domain::Day {
    domain::Day {
        id: id.into(),
        week_id: week_id.into(),
        day_of_week: domain::DayOfWeek::new(day_of_week).unwrap(),
        title: title.to_string(),
    }
}

pub fn workout_exercise(
    id: u128,
    day_id: u128,
    exercise_id: u128,
    order: u32,
    superset: Option<u128>,
) -> domain::WorkoutExercise {
    domain::WorkoutExercise {
        id: id.into(),
        day_id: day_id.into(),
        exercise_id: exercise_id.into(),
        order,
        prescription: prescription(),
        superset: superset.map(domain::WorkoutExerciseID::from),
    }
}

pub fn prescription() -> domain::Prescription {
    domain::Prescription::new(
        domain::WorkoutExerciseType::Reps,
        domain::Sets::new(3).unwrap(),
        8,
        domain::Time::new(90).unwrap(),
    )
    .unwrap()
    .with_weight(domain::Weight::new(60.0).unwrap())
    .with_rpe(domain::RPE::new(8.0).unwrap())
    .with_note("Pause at the bottom")
}
