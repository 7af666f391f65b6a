use chrono::{DateTime, Utc};
use derive_more::{Display, Into};

use crate::{
    CreateError, DeleteError, ExerciseID, Name, Prescription, ProgramTree, ReadError, UpdateError,
    ValidationError,
};

id!(ProgramID);
id!(WeekID);
id!(DayID);
id!(WorkoutExerciseID);

#[allow(async_fn_in_trait)]
pub trait ProgramRepository {
    async fn read_programs(&self) -> Result<Vec<Program>, ReadError>;
    async fn read_program_tree(&self, id: ProgramID) -> Result<ProgramTree, ReadError>;
    async fn create_program(
        &self,
        title: Name,
        description: String,
        program_type: ProgramType,
    ) -> Result<Program, CreateError>;
    async fn modify_program(
        &self,
        id: ProgramID,
        title: Option<Name>,
        description: Option<String>,
        program_type: Option<ProgramType>,
    ) -> Result<Program, UpdateError>;
    async fn delete_program(&self, id: ProgramID) -> Result<ProgramID, DeleteError>;
}

#[allow(async_fn_in_trait)]
pub trait ProgramService {
    async fn get_programs(&self) -> Result<Vec<Program>, ReadError>;
    async fn get_program_tree(&self, id: ProgramID) -> Result<ProgramTree, ReadError>;
    async fn create_program(
        &self,
        title: Name,
        description: String,
        program_type: ProgramType,
    ) -> Result<Program, CreateError>;
    async fn modify_program(
        &self,
        id: ProgramID,
        title: Option<Name>,
        description: Option<String>,
        program_type: Option<ProgramType>,
    ) -> Result<Program, UpdateError>;
    async fn delete_program(&self, id: ProgramID) -> Result<ProgramID, DeleteError>;

    async fn validate_program_title(
        &self,
        title: &str,
        id: ProgramID,
    ) -> Result<Name, ValidationError> {
        match Name::new(title) {
            Ok(title) => match self.get_programs().await {
                Ok(programs) => {
                    if programs.iter().all(|p| p.id == id || p.title != title) {
                        Ok(title)
                    } else {
                        Err(ValidationError::Conflict("title".to_string()))
                    }
                }
                Err(err) => Err(ValidationError::Other(err.into())),
            },
            Err(err) => Err(ValidationError::Other(err.into())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub id: ProgramID,
    pub title: Name,
    pub description: String,
    pub program_type: ProgramType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::AsRefStr,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum ProgramType {
    #[default]
    General,
    Strength,
    Hypertrophy,
    Endurance,
    Mobility,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Week {
    pub id: WeekID,
    pub program_id: ProgramID,
    pub order: WeekOrder,
}

/// Position of a week within its program, starting at 1.
#[derive(Debug, Display, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekOrder(u32);

impl WeekOrder {
    pub const FIRST: WeekOrder = WeekOrder(1);

    pub fn new(value: u32) -> Result<Self, WeekOrderError> {
        if value == 0 {
            return Err(WeekOrderError::Zero);
        }

        Ok(Self(value))
    }

    /// `None` if the order is already the highest representable one.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WeekOrderError {
    #[error("Week must be 1 or greater")]
    Zero,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Day {
    pub id: DayID,
    pub week_id: WeekID,
    pub day_of_week: DayOfWeek,
    pub title: String,
}

/// Weekday of a training day, 1 (Monday) to 7 (Sunday).
#[derive(Debug, Display, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayOfWeek(u8);

impl DayOfWeek {
    pub fn new(value: u8) -> Result<Self, DayOfWeekError> {
        if !(1..=7).contains(&value) {
            return Err(DayOfWeekError::OutOfRange(value));
        }

        Ok(Self(value))
    }

    pub fn iter() -> impl Iterator<Item = DayOfWeek> {
        (1..=7).map(DayOfWeek)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self.0 {
            1 => "Monday",
            2 => "Tuesday",
            3 => "Wednesday",
            4 => "Thursday",
            5 => "Friday",
            6 => "Saturday",
            _ => "Sunday",
        }
    }
}

impl TryFrom<&str> for DayOfWeek {
    type Error = DayOfWeekError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.parse::<u8>() {
            Ok(parsed_value) => DayOfWeek::new(parsed_value),
            Err(_) => Err(DayOfWeekError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum DayOfWeekError {
    #[error("Day of week must be in the range 1 to 7 ({0})")]
    OutOfRange(u8),
    #[error("Day of week must be an integer")]
    ParseError,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutExercise {
    pub id: WorkoutExerciseID,
    pub day_id: DayID,
    pub exercise_id: ExerciseID,
    pub order: u32,
    pub prescription: Prescription,
    pub superset: Option<WorkoutExerciseID>,
}
