use std::collections::{BTreeMap, BTreeSet};

use uuid::Uuid;

use crate::{
    Day, DayID, DayOfWeek, ExerciseID, Program, ReorderError, SupersetError, Week, WeekID,
    WeekOrder, WorkoutExercise, WorkoutExerciseID, reorder, validate_supersets,
};

/// A program with all its weeks, days and workout exercises.
///
/// Weeks are sorted by order, days by weekday and workout exercises by order.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramTree {
    pub program: Program,
    pub weeks: Vec<WeekTree>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeekTree {
    pub week: Week,
    pub days: Vec<DayTree>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayTree {
    pub day: Day,
    pub exercises: Vec<WorkoutExercise>,
}

impl ProgramTree {
    /// Builds a tree from flat rows. Rows not belonging to the program are ignored.
    #[must_use]
    pub fn assemble(
        program: Program,
        weeks: impl IntoIterator<Item = Week>,
        days: impl IntoIterator<Item = Day>,
        exercises: impl IntoIterator<Item = WorkoutExercise>,
    ) -> Self {
        let mut exercises_per_day: BTreeMap<DayID, Vec<WorkoutExercise>> = BTreeMap::new();
        for exercise in exercises {
            exercises_per_day
                .entry(exercise.day_id)
                .or_default()
                .push(exercise);
        }

        let mut days_per_week: BTreeMap<WeekID, Vec<DayTree>> = BTreeMap::new();
        for day in days {
            let mut exercises = exercises_per_day.remove(&day.id).unwrap_or_default();
            exercises.sort_by_key(|e| e.order);
            days_per_week
                .entry(day.week_id)
                .or_default()
                .push(DayTree { day, exercises });
        }

        let mut weeks = weeks
            .into_iter()
            .filter(|w| w.program_id == program.id)
            .map(|week| {
                let mut days = days_per_week.remove(&week.id).unwrap_or_default();
                days.sort_by_key(|d| d.day.day_of_week);
                WeekTree { week, days }
            })
            .collect::<Vec<_>>();
        weeks.sort_by_key(|w| w.week.order);

        Self { program, weeks }
    }

    #[must_use]
    pub fn week(&self, id: WeekID) -> Option<&WeekTree> {
        self.weeks.iter().find(|w| w.week.id == id)
    }

    #[must_use]
    pub fn week_at(&self, order: WeekOrder) -> Option<&WeekTree> {
        self.weeks.iter().find(|w| w.week.order == order)
    }

    #[must_use]
    pub fn day(&self, id: DayID) -> Option<&DayTree> {
        self.weeks.iter().find_map(|w| w.day(id))
    }

    pub fn day_mut(&mut self, id: DayID) -> Option<&mut DayTree> {
        self.weeks
            .iter_mut()
            .flat_map(|w| w.days.iter_mut())
            .find(|d| d.day.id == id)
    }

    #[must_use]
    pub fn workout_exercise(&self, id: WorkoutExerciseID) -> Option<&WorkoutExercise> {
        self.days().flat_map(|d| d.exercises.iter()).find(|e| e.id == id)
    }

    pub fn days(&self) -> impl Iterator<Item = &DayTree> {
        self.weeks.iter().flat_map(|w| w.days.iter())
    }

    #[must_use]
    pub fn week_orders(&self) -> Vec<WeekOrder> {
        self.weeks.iter().map(|w| w.week.order).collect()
    }

    #[must_use]
    pub fn num_weeks(&self) -> usize {
        self.weeks.len()
    }

    #[must_use]
    pub fn num_days(&self) -> usize {
        self.days().count()
    }

    #[must_use]
    pub fn num_workout_exercises(&self) -> usize {
        self.days().map(|d| d.exercises.len()).sum()
    }

    /// Ids of the program and of every week, day and workout exercise in it.
    #[must_use]
    pub fn ids(&self) -> BTreeSet<Uuid> {
        let mut ids = BTreeSet::from([*self.program.id]);
        for week in &self.weeks {
            ids.insert(*week.week.id);
            for day in &week.days {
                ids.insert(*day.day.id);
                ids.extend(day.exercises.iter().map(|e| *e.id));
            }
        }
        ids
    }

    /// Catalog exercises referenced anywhere in the program.
    #[must_use]
    pub fn exercises(&self) -> BTreeSet<ExerciseID> {
        self.days()
            .flat_map(|d| d.exercises.iter().map(|e| e.exercise_id))
            .collect()
    }

    /// Checks the structural invariants of the whole tree.
    pub fn validate(&self) -> Result<(), TreeError> {
        let mut orders = BTreeSet::new();
        for week in &self.weeks {
            if !orders.insert(week.week.order) {
                return Err(TreeError::DuplicateWeek(week.week.order));
            }
            week.validate()?;
        }
        Ok(())
    }
}

impl WeekTree {
    #[must_use]
    pub fn day(&self, id: DayID) -> Option<&DayTree> {
        self.days.iter().find(|d| d.day.id == id)
    }

    #[must_use]
    pub fn day_at(&self, day_of_week: DayOfWeek) -> Option<&DayTree> {
        self.days.iter().find(|d| d.day.day_of_week == day_of_week)
    }

    /// Estimated duration of the week in seconds.
    #[must_use]
    pub fn duration(&self) -> u32 {
        self.days.iter().map(DayTree::duration).sum()
    }

    fn validate(&self) -> Result<(), TreeError> {
        let mut days_of_week = BTreeSet::new();
        for day in &self.days {
            if !days_of_week.insert(day.day.day_of_week) {
                return Err(TreeError::DuplicateDay(self.week.id, day.day.day_of_week));
            }
            day.validate()?;
        }
        Ok(())
    }
}

impl DayTree {
    /// Estimated duration of the day in seconds.
    #[must_use]
    pub fn duration(&self) -> u32 {
        self.exercises.iter().map(|e| e.prescription.duration()).sum()
    }

    #[must_use]
    pub fn exercise_ids(&self) -> Vec<WorkoutExerciseID> {
        self.exercises.iter().map(|e| e.id).collect()
    }

    /// Applies a complete reordering locally.
    pub fn reorder(&mut self, ids: &[WorkoutExerciseID]) -> Result<(), ReorderError> {
        let order = reorder(&self.exercises, ids)?;
        for exercise in &mut self.exercises {
            if let Some(o) = order.get(&exercise.id) {
                exercise.order = *o;
            }
        }
        self.exercises.sort_by_key(|e| e.order);
        Ok(())
    }

    fn validate(&self) -> Result<(), TreeError> {
        let mut orders = BTreeSet::new();
        for exercise in &self.exercises {
            if !orders.insert(exercise.order) {
                return Err(TreeError::DuplicateExerciseOrder(self.day.id, exercise.order));
            }
        }
        validate_supersets(&self.exercises)?;
        Ok(())
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum TreeError {
    #[error("week {0} exists more than once")]
    DuplicateWeek(WeekOrder),
    #[error("week {0} contains day {1} more than once")]
    DuplicateDay(WeekID, DayOfWeek),
    #[error("day {0} contains exercise order {1} more than once")]
    DuplicateExerciseOrder(DayID, u32),
    #[error(transparent)]
    Superset(#[from] SupersetError),
}
