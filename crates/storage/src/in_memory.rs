//! In-memory store
//!
//! Holds all tables behind a single lock. Every repository call runs as one transaction on a
//! copy of the tables, which replaces the current state only if the call succeeds. Concurrent
//! callers are serialized, the last committed write wins.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{Arc, Mutex, PoisonError},
};

use chrono::{TimeDelta, Utc};
use coach_domain as domain;
use log::debug;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemory {
    tables: Mutex<Tables>,
}

#[derive(Default, Clone)]
struct Tables {
    programs: BTreeMap<domain::ProgramID, domain::Program>,
    weeks: BTreeMap<domain::WeekID, domain::Week>,
    days: BTreeMap<domain::DayID, domain::Day>,
    workout_exercises: BTreeMap<domain::WorkoutExerciseID, domain::WorkoutExercise>,
    exercises: BTreeMap<domain::ExerciseID, domain::Exercise>,
    assignments: BTreeMap<domain::AssignmentID, domain::Assignment>,
    users: BTreeMap<domain::UserID, domain::User>,
    assets: BTreeMap<domain::AssetID, Asset>,
}

/// Content is shared between table copies.
#[derive(Clone)]
struct Asset {
    file_name: String,
    content: Arc<[u8]>,
}

impl InMemory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_program_tree(
        &self,
        tree: domain::ProgramTree,
    ) -> Result<(), domain::StorageError> {
        self.transaction("insert program tree", |tables| {
            tables.insert_program_tree(tree);
            Ok(())
        })
    }

    pub fn insert_exercise(&self, exercise: domain::Exercise) -> Result<(), domain::StorageError> {
        self.transaction("insert exercise", |tables| {
            tables.exercises.insert(exercise.id, exercise);
            Ok(())
        })
    }

    /// Users are owned by an external directory and can only be seeded.
    pub fn insert_user(&self, user: domain::User) -> Result<(), domain::StorageError> {
        self.transaction("insert user", |tables| {
            tables.users.insert(user.id, user);
            Ok(())
        })
    }

    pub fn insert_assignment(
        &self,
        assignment: domain::Assignment,
    ) -> Result<(), domain::StorageError> {
        self.transaction("insert assignment", |tables| {
            tables.assignments.insert(assignment.id, assignment);
            Ok(())
        })
    }

    /// Marks an assignment as completed, as done by the training completion flow.
    pub fn complete_assignment(
        &self,
        id: domain::AssignmentID,
    ) -> Result<domain::Assignment, domain::UpdateError> {
        self.transaction("complete assignment", |tables| {
            let now = Utc::now();
            let assignment = tables
                .assignments
                .get_mut(&id)
                .ok_or(domain::UpdateError::NotFound)?;
            assignment.completed = true;
            assignment.completed_at = Some(now);
            assignment.updated_at = now;
            Ok(assignment.clone())
        })
    }

    /// File name and content of an uploaded asset.
    #[must_use]
    pub fn asset(&self, id: domain::AssetID) -> Option<(String, Arc<[u8]>)> {
        self.read(|tables| {
            Ok::<_, domain::StorageError>(
                tables
                    .assets
                    .get(&id)
                    .map(|a| (a.file_name.clone(), a.content.clone())),
            )
        })
        .ok()
        .flatten()
    }

    fn read<T, E>(&self, f: impl FnOnce(&Tables) -> Result<T, E>) -> Result<T, E> {
        f(&self.lock())
    }

    /// A panic inside `f` only loses the draft, so the committed tables stay consistent.
    fn transaction<T, E>(
        &self,
        action: &str,
        f: impl FnOnce(&mut Tables) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut tables = self.lock();
        let mut draft = tables.clone();
        let result = f(&mut draft)?;
        *tables = draft;
        debug!("committed {action}");
        Ok(result)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn new_id() -> Uuid {
    Uuid::new_v4()
}

impl Tables {
    fn program_tree(&self, id: domain::ProgramID) -> Option<domain::ProgramTree> {
        let program = self.programs.get(&id)?.clone();
        let weeks = self
            .weeks
            .values()
            .filter(|w| w.program_id == id)
            .cloned()
            .collect::<Vec<_>>();
        let week_ids = weeks.iter().map(|w| w.id).collect::<BTreeSet<_>>();
        let days = self
            .days
            .values()
            .filter(|d| week_ids.contains(&d.week_id))
            .cloned()
            .collect::<Vec<_>>();
        let day_ids = days.iter().map(|d| d.id).collect::<BTreeSet<_>>();
        let exercises = self
            .workout_exercises
            .values()
            .filter(|e| day_ids.contains(&e.day_id))
            .cloned();
        Some(domain::ProgramTree::assemble(
            program, weeks, days, exercises,
        ))
    }

    fn week_tree(&self, id: domain::WeekID) -> Option<domain::WeekTree> {
        let week = self.weeks.get(&id)?;
        self.program_tree(week.program_id)?.week(id).cloned()
    }

    fn day_tree(&self, id: domain::DayID) -> Option<domain::DayTree> {
        let day = self.days.get(&id)?;
        self.week_tree(day.week_id)?.day(id).cloned()
    }

    fn days_of_week(&self, week_id: domain::WeekID) -> Vec<domain::Day> {
        self.days
            .values()
            .filter(|d| d.week_id == week_id)
            .cloned()
            .collect()
    }

    fn exercises_of_day(&self, day_id: domain::DayID) -> Vec<domain::WorkoutExercise> {
        self.workout_exercises
            .values()
            .filter(|e| e.day_id == day_id)
            .cloned()
            .collect()
    }

    fn touch_program(&mut self, id: domain::ProgramID) {
        if let Some(program) = self.programs.get_mut(&id) {
            program.updated_at = Utc::now();
        }
    }

    fn touch_week(&mut self, id: domain::WeekID) {
        if let Some(program_id) = self.weeks.get(&id).map(|w| w.program_id) {
            self.touch_program(program_id);
        }
    }

    fn touch_day(&mut self, id: domain::DayID) {
        if let Some(week_id) = self.days.get(&id).map(|d| d.week_id) {
            self.touch_week(week_id);
        }
    }

    fn insert_program_tree(&mut self, tree: domain::ProgramTree) {
        self.programs.insert(tree.program.id, tree.program);
        for week in tree.weeks {
            self.insert_week_tree(week);
        }
    }

    fn insert_week_tree(&mut self, tree: domain::WeekTree) {
        self.weeks.insert(tree.week.id, tree.week);
        for day in tree.days {
            self.insert_day_tree(day);
        }
    }

    fn insert_day_tree(&mut self, tree: domain::DayTree) {
        self.days.insert(tree.day.id, tree.day);
        for exercise in tree.exercises {
            self.workout_exercises.insert(exercise.id, exercise);
        }
    }

    fn remove_day(&mut self, id: domain::DayID) -> Option<domain::Day> {
        let day = self.days.remove(&id)?;
        self.workout_exercises.retain(|_, e| e.day_id != id);
        Some(day)
    }

    fn remove_week(&mut self, id: domain::WeekID) -> Option<domain::Week> {
        let week = self.weeks.remove(&id)?;
        for day_id in self.days_of_week(id).iter().map(|d| d.id) {
            self.remove_day(day_id);
        }
        Some(week)
    }

    fn remove_program(&mut self, id: domain::ProgramID) -> Option<domain::Program> {
        let program = self.programs.remove(&id)?;
        let week_ids = self
            .weeks
            .values()
            .filter(|w| w.program_id == id)
            .map(|w| w.id)
            .collect::<Vec<_>>();
        for week_id in week_ids {
            self.remove_week(week_id);
        }
        self.assignments.retain(|_, a| a.program_id != id);
        Some(program)
    }

    fn has_incomplete_assignment(&self, user_id: domain::UserID) -> bool {
        self.assignments
            .values()
            .any(|a| a.user_id == user_id && !a.completed)
    }
}

impl domain::ProgramRepository for InMemory {
    async fn read_programs(&self) -> Result<Vec<domain::Program>, domain::ReadError> {
        self.read(|tables| {
            let mut programs = tables.programs.values().cloned().collect::<Vec<_>>();
            programs.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
            Ok(programs)
        })
    }

    async fn read_program_tree(
        &self,
        id: domain::ProgramID,
    ) -> Result<domain::ProgramTree, domain::ReadError> {
        self.read(|tables| tables.program_tree(id).ok_or(domain::ReadError::NotFound))
    }

    async fn create_program(
        &self,
        title: domain::Name,
        description: String,
        program_type: domain::ProgramType,
    ) -> Result<domain::Program, domain::CreateError> {
        self.transaction("create program", |tables| {
            let now = Utc::now();
            let program = domain::Program {
                id: new_id().into(),
                title,
                description,
                program_type,
                created_at: now,
                updated_at: now,
            };
            tables.programs.insert(program.id, program.clone());
            Ok(program)
        })
    }

    async fn modify_program(
        &self,
        id: domain::ProgramID,
        title: Option<domain::Name>,
        description: Option<String>,
        program_type: Option<domain::ProgramType>,
    ) -> Result<domain::Program, domain::UpdateError> {
        self.transaction("modify program", |tables| {
            let program = tables
                .programs
                .get_mut(&id)
                .ok_or(domain::UpdateError::NotFound)?;
            if let Some(title) = title {
                program.title = title;
            }
            if let Some(description) = description {
                program.description = description;
            }
            if let Some(program_type) = program_type {
                program.program_type = program_type;
            }
            program.updated_at = Utc::now();
            Ok(program.clone())
        })
    }

    async fn delete_program(
        &self,
        id: domain::ProgramID,
    ) -> Result<domain::ProgramID, domain::DeleteError> {
        self.transaction("delete program", |tables| {
            tables
                .remove_program(id)
                .map(|p| p.id)
                .ok_or(domain::DeleteError::NotFound)
        })
    }
}

impl domain::OrderingRepository for InMemory {
    async fn create_next_week(
        &self,
        program_id: domain::ProgramID,
    ) -> Result<domain::Week, domain::CreateError> {
        self.transaction("create week", |tables| {
            if !tables.programs.contains_key(&program_id) {
                return Err(domain::CreateError::NotFound);
            }
            let weeks = tables
                .weeks
                .values()
                .filter(|w| w.program_id == program_id)
                .cloned()
                .collect::<Vec<_>>();
            let order = domain::next_week_order(&weeks).ok_or_else(|| {
                domain::CreateError::InvalidInput(format!(
                    "program {program_id} has no week order left"
                ))
            })?;
            let week = domain::Week {
                id: new_id().into(),
                program_id,
                order,
            };
            tables.weeks.insert(week.id, week.clone());
            tables.touch_program(program_id);
            Ok(week)
        })
    }

    async fn delete_week(&self, id: domain::WeekID) -> Result<domain::WeekID, domain::DeleteError> {
        self.transaction("delete week", |tables| {
            tables.touch_week(id);
            tables
                .remove_week(id)
                .map(|w| w.id)
                .ok_or(domain::DeleteError::NotFound)
        })
    }

    async fn create_day(
        &self,
        week_id: domain::WeekID,
        day_of_week: domain::DayOfWeek,
        title: String,
    ) -> Result<domain::Day, domain::CreateError> {
        self.transaction("create day", |tables| {
            if !tables.weeks.contains_key(&week_id) {
                return Err(domain::CreateError::NotFound);
            }
            domain::check_day_slot(&tables.days_of_week(week_id), day_of_week, None)
                .map_err(domain::CreateError::DaySlotTaken)?;
            let day = domain::Day {
                id: new_id().into(),
                week_id,
                day_of_week,
                title,
            };
            tables.days.insert(day.id, day.clone());
            tables.touch_week(week_id);
            Ok(day)
        })
    }

    async fn modify_day(
        &self,
        id: domain::DayID,
        title: Option<String>,
        day_of_week: Option<domain::DayOfWeek>,
    ) -> Result<domain::Day, domain::UpdateError> {
        self.transaction("modify day", |tables| {
            let week_id = tables
                .days
                .get(&id)
                .map(|d| d.week_id)
                .ok_or(domain::UpdateError::NotFound)?;
            if let Some(day_of_week) = day_of_week {
                domain::check_day_slot(&tables.days_of_week(week_id), day_of_week, Some(id))
                    .map_err(domain::UpdateError::DaySlotTaken)?;
            }
            tables.touch_week(week_id);
            let day = tables
                .days
                .get_mut(&id)
                .ok_or(domain::UpdateError::NotFound)?;
            if let Some(title) = title {
                day.title = title;
            }
            if let Some(day_of_week) = day_of_week {
                day.day_of_week = day_of_week;
            }
            Ok(day.clone())
        })
    }

    async fn delete_day(&self, id: domain::DayID) -> Result<domain::DayID, domain::DeleteError> {
        self.transaction("delete day", |tables| {
            tables.touch_day(id);
            tables
                .remove_day(id)
                .map(|d| d.id)
                .ok_or(domain::DeleteError::NotFound)
        })
    }

    async fn create_workout_exercise(
        &self,
        day_id: domain::DayID,
        exercise_id: domain::ExerciseID,
        prescription: domain::Prescription,
    ) -> Result<domain::WorkoutExercise, domain::CreateError> {
        self.transaction("create workout exercise", |tables| {
            if !tables.days.contains_key(&day_id) || !tables.exercises.contains_key(&exercise_id)
            {
                return Err(domain::CreateError::NotFound);
            }
            let workout_exercise = domain::WorkoutExercise {
                id: new_id().into(),
                day_id,
                exercise_id,
                order: domain::next_exercise_order(&tables.exercises_of_day(day_id)),
                prescription,
                superset: None,
            };
            tables
                .workout_exercises
                .insert(workout_exercise.id, workout_exercise.clone());
            tables.touch_day(day_id);
            Ok(workout_exercise)
        })
    }

    async fn modify_workout_exercise(
        &self,
        id: domain::WorkoutExerciseID,
        prescription: domain::Prescription,
    ) -> Result<domain::WorkoutExercise, domain::UpdateError> {
        self.transaction("modify workout exercise", |tables| {
            let workout_exercise = tables
                .workout_exercises
                .get_mut(&id)
                .ok_or(domain::UpdateError::NotFound)?;
            workout_exercise.prescription = prescription;
            let result = workout_exercise.clone();
            tables.touch_day(result.day_id);
            Ok(result)
        })
    }

    async fn set_superset(
        &self,
        id: domain::WorkoutExerciseID,
        partner: Option<domain::WorkoutExerciseID>,
    ) -> Result<domain::WorkoutExercise, domain::UpdateError> {
        self.transaction("set superset", |tables| {
            let day_id = tables
                .workout_exercises
                .get(&id)
                .map(|e| e.day_id)
                .ok_or(domain::UpdateError::NotFound)?;
            domain::check_superset(&tables.exercises_of_day(day_id), id, partner)?;
            tables.touch_day(day_id);
            let workout_exercise = tables
                .workout_exercises
                .get_mut(&id)
                .ok_or(domain::UpdateError::NotFound)?;
            workout_exercise.superset = partner;
            Ok(workout_exercise.clone())
        })
    }

    async fn reorder_workout_exercises(
        &self,
        day_id: domain::DayID,
        ids: Vec<domain::WorkoutExerciseID>,
    ) -> Result<BTreeMap<domain::WorkoutExerciseID, u32>, domain::UpdateError> {
        self.transaction("reorder workout exercises", |tables| {
            if !tables.days.contains_key(&day_id) {
                return Err(domain::UpdateError::NotFound);
            }
            let order = domain::reorder(&tables.exercises_of_day(day_id), &ids)?;
            for (id, o) in &order {
                if let Some(workout_exercise) = tables.workout_exercises.get_mut(id) {
                    workout_exercise.order = *o;
                }
            }
            tables.touch_day(day_id);
            Ok(order)
        })
    }

    async fn delete_workout_exercise(
        &self,
        id: domain::WorkoutExerciseID,
    ) -> Result<domain::WorkoutExerciseID, domain::DeleteError> {
        self.transaction("delete workout exercise", |tables| {
            let workout_exercise = tables
                .workout_exercises
                .remove(&id)
                .ok_or(domain::DeleteError::NotFound)?;
            for other in tables.workout_exercises.values_mut() {
                if other.superset == Some(id) {
                    other.superset = None;
                }
            }
            tables.touch_day(workout_exercise.day_id);
            Ok(id)
        })
    }
}

impl domain::CloneRepository for InMemory {
    async fn clone_program(
        &self,
        source_id: domain::ProgramID,
        title: domain::Name,
    ) -> Result<domain::ProgramTree, domain::CreateError> {
        self.transaction("clone program", |tables| {
            let source = tables
                .program_tree(source_id)
                .ok_or(domain::CreateError::NotFound)?;
            let copy = domain::copy_program(&source, title, Utc::now(), &mut new_id);
            tables.insert_program_tree(copy.clone());
            Ok(copy)
        })
    }

    async fn duplicate_week(
        &self,
        week_id: domain::WeekID,
        destination: domain::WeekOrder,
        program_id: domain::ProgramID,
    ) -> Result<domain::WeekTree, domain::CreateError> {
        self.transaction("duplicate week", |tables| {
            let source = tables
                .week_tree(week_id)
                .ok_or(domain::CreateError::NotFound)?;
            let program = tables
                .program_tree(program_id)
                .ok_or(domain::CreateError::NotFound)?;
            let copy = domain::duplicate_week(&source, &program, destination, &mut new_id)?;
            tables.insert_week_tree(copy.clone());
            tables.touch_program(program_id);
            Ok(copy)
        })
    }

    async fn clone_day(
        &self,
        source_week_id: domain::WeekID,
        source_day_of_week: domain::DayOfWeek,
        destination_week_id: domain::WeekID,
        destination_day_of_week: domain::DayOfWeek,
    ) -> Result<domain::DayTree, domain::CreateError> {
        self.transaction("clone day", |tables| {
            let source = tables
                .week_tree(source_week_id)
                .ok_or(domain::CreateError::NotFound)?;
            let destination = tables
                .week_tree(destination_week_id)
                .ok_or(domain::CreateError::NotFound)?;
            let copy = domain::clone_day(
                &source,
                source_day_of_week,
                &destination,
                destination_day_of_week,
                &mut new_id,
            )?;
            tables.insert_day_tree(copy.clone());
            tables.touch_week(destination_week_id);
            Ok(copy)
        })
    }

    async fn copy_workout_exercise(
        &self,
        id: domain::WorkoutExerciseID,
        destination_day_id: domain::DayID,
    ) -> Result<domain::WorkoutExercise, domain::CreateError> {
        self.transaction("copy workout exercise", |tables| {
            let source = tables
                .workout_exercises
                .get(&id)
                .cloned()
                .ok_or(domain::CreateError::NotFound)?;
            let destination = tables
                .day_tree(destination_day_id)
                .ok_or(domain::CreateError::NotFound)?;
            let copy = domain::copy_workout_exercise(&source, &destination, &mut new_id);
            tables.workout_exercises.insert(copy.id, copy.clone());
            tables.touch_day(destination_day_id);
            Ok(copy)
        })
    }
}

impl domain::AssignmentRepository for InMemory {
    async fn read_assignments(
        &self,
        program_id: domain::ProgramID,
    ) -> Result<Vec<domain::Assignment>, domain::ReadError> {
        self.read(|tables| {
            if !tables.programs.contains_key(&program_id) {
                return Err(domain::ReadError::NotFound);
            }
            Ok(sorted_assignments(
                tables.assignments.values().filter(|a| a.program_id == program_id),
            ))
        })
    }

    async fn read_user_assignments(
        &self,
        user_id: domain::UserID,
    ) -> Result<Vec<domain::Assignment>, domain::ReadError> {
        self.read(|tables| {
            if !tables.users.contains_key(&user_id) {
                return Err(domain::ReadError::NotFound);
            }
            Ok(sorted_assignments(
                tables.assignments.values().filter(|a| a.user_id == user_id),
            ))
        })
    }

    async fn create_assignment(
        &self,
        user_id: domain::UserID,
        program_id: domain::ProgramID,
        valid_for: Option<TimeDelta>,
    ) -> Result<domain::Assignment, domain::CreateError> {
        self.transaction("create assignment", |tables| {
            if !tables.users.contains_key(&user_id) || !tables.programs.contains_key(&program_id)
            {
                return Err(domain::CreateError::NotFound);
            }
            domain::check_assignable(
                user_id,
                &tables.assignments.values().cloned().collect::<Vec<_>>(),
            )?;
            let now = Utc::now();
            let assignment = domain::Assignment {
                id: new_id().into(),
                program_id,
                user_id,
                completed: false,
                completed_at: None,
                expires_at: valid_for.and_then(|d| now.checked_add_signed(d)),
                created_at: now,
                updated_at: now,
            };
            tables.assignments.insert(assignment.id, assignment.clone());
            Ok(assignment)
        })
    }

    async fn delete_assignment(
        &self,
        id: domain::AssignmentID,
    ) -> Result<domain::AssignmentID, domain::DeleteError> {
        self.transaction("delete assignment", |tables| {
            let assignment = tables
                .assignments
                .get(&id)
                .ok_or(domain::DeleteError::NotFound)?;
            domain::check_removable(assignment)?;
            tables.assignments.remove(&id);
            Ok(id)
        })
    }
}

fn sorted_assignments<'a>(
    assignments: impl Iterator<Item = &'a domain::Assignment>,
) -> Vec<domain::Assignment> {
    let mut assignments = assignments.cloned().collect::<Vec<_>>();
    assignments.sort_by_key(|a| (a.created_at, a.id));
    assignments
}

impl domain::ExerciseRepository for InMemory {
    async fn read_exercises(
        &self,
        filter: &domain::ExerciseFilter,
        page: domain::PageRequest,
    ) -> Result<domain::Page<domain::Exercise>, domain::ReadError> {
        self.read(|tables| {
            let exercises = filter
                .exercises(tables.exercises.values())
                .into_iter()
                .cloned()
                .collect::<Vec<_>>();
            Ok(page.slice(&exercises))
        })
    }

    async fn read_exercise(
        &self,
        id: domain::ExerciseID,
    ) -> Result<domain::Exercise, domain::ReadError> {
        self.read(|tables| {
            tables
                .exercises
                .get(&id)
                .cloned()
                .ok_or(domain::ReadError::NotFound)
        })
    }

    async fn create_exercise(
        &self,
        draft: domain::ExerciseDraft,
    ) -> Result<domain::Exercise, domain::CreateError> {
        self.transaction("create exercise", |tables| {
            if let Some(video) = draft.video {
                if !tables.assets.contains_key(&video) {
                    return Err(domain::CreateError::InvalidInput(format!(
                        "unknown asset {video}"
                    )));
                }
            }
            let exercise = draft.into_exercise(new_id().into());
            tables.exercises.insert(exercise.id, exercise.clone());
            Ok(exercise)
        })
    }

    async fn modify_exercise(
        &self,
        id: domain::ExerciseID,
        change: domain::ExerciseChange,
    ) -> Result<domain::Exercise, domain::UpdateError> {
        self.transaction("modify exercise", |tables| {
            if let domain::VideoChange::Replaced(video) = change.video {
                if !tables.assets.contains_key(&video) {
                    return Err(domain::UpdateError::InvalidInput(format!(
                        "unknown asset {video}"
                    )));
                }
            }
            let exercise = tables
                .exercises
                .get_mut(&id)
                .ok_or(domain::UpdateError::NotFound)?;
            change.apply(exercise);
            Ok(exercise.clone())
        })
    }

    async fn delete_exercise(
        &self,
        id: domain::ExerciseID,
    ) -> Result<domain::ExerciseID, domain::DeleteError> {
        self.transaction("delete exercise", |tables| {
            if !tables.exercises.contains_key(&id) {
                return Err(domain::DeleteError::NotFound);
            }
            if tables
                .workout_exercises
                .values()
                .any(|e| e.exercise_id == id)
            {
                return Err(domain::DeleteError::InUse);
            }
            tables.exercises.remove(&id);
            Ok(id)
        })
    }
}

impl domain::UserRepository for InMemory {
    async fn read_available_users(
        &self,
        filter: &domain::UserFilter,
        page: domain::PageRequest,
    ) -> Result<domain::Page<domain::User>, domain::ReadError> {
        self.read(|tables| {
            let mut users = tables
                .users
                .values()
                .filter(|u| {
                    u.is_subscribed() && !tables.has_incomplete_assignment(u.id) && filter.matches(u)
                })
                .cloned()
                .collect::<Vec<_>>();
            users.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
            Ok(page.slice(&users))
        })
    }

    async fn read_user(&self, id: domain::UserID) -> Result<domain::User, domain::ReadError> {
        self.read(|tables| {
            tables
                .users
                .get(&id)
                .cloned()
                .ok_or(domain::ReadError::NotFound)
        })
    }
}

impl domain::AssetRepository for InMemory {
    async fn upload_asset(
        &self,
        file_name: &str,
        content: Vec<u8>,
    ) -> Result<domain::AssetID, domain::CreateError> {
        if content.is_empty() {
            return Err(domain::CreateError::InvalidInput(format!(
                "{file_name} is empty"
            )));
        }
        self.transaction("upload asset", |tables| {
            let id = domain::AssetID::from(new_id());
            tables.assets.insert(
                id,
                Asset {
                    file_name: file_name.to_string(),
                    content: content.into(),
                },
            );
            Ok(id)
        })
    }
}
