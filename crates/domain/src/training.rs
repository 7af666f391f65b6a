use std::fmt;

use derive_more::{Display, Into};

#[derive(Debug, Display, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord)]
pub struct Sets(u32);

impl Sets {
    pub fn new(value: u32) -> Result<Self, SetsError> {
        if !(1..100).contains(&value) {
            return Err(SetsError::OutOfRange);
        }

        Ok(Self(value))
    }
}

impl TryFrom<&str> for Sets {
    type Error = SetsError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.parse::<u32>() {
            Ok(parsed_value) => Sets::new(parsed_value),
            Err(_) => Err(SetsError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SetsError {
    #[error("Sets must be in the range 1 to 99")]
    OutOfRange,
    #[error("Sets must be an integer")]
    ParseError,
}

#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord)]
pub struct Reps(u32);

impl Reps {
    pub fn new(value: u32) -> Result<Self, RepsError> {
        if !(0..1000).contains(&value) {
            return Err(RepsError::OutOfRange);
        }

        Ok(Self(value))
    }
}

impl TryFrom<&str> for Reps {
    type Error = RepsError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.parse::<u32>() {
            Ok(parsed_value) => Reps::new(parsed_value),
            Err(_) => Err(RepsError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RepsError {
    #[error("Reps must be in the range 0 to 999")]
    OutOfRange,
    #[error("Reps must be an integer")]
    ParseError,
}

/// Duration in seconds.
#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord)]
pub struct Time(u32);

impl Time {
    pub fn new(value: u32) -> Result<Self, TimeError> {
        if !(0..3600).contains(&value) {
            return Err(TimeError::OutOfRange);
        }

        Ok(Self(value))
    }
}

impl TryFrom<&str> for Time {
    type Error = TimeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.parse::<u32>() {
            Ok(parsed_value) => Time::new(parsed_value),
            Err(_) => Err(TimeError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum TimeError {
    #[error("Time must be in the range 0 to 3599 s")]
    OutOfRange,
    #[error("Time must be an integer")]
    ParseError,
}

#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, PartialOrd)]
pub struct Weight(f32);

impl Weight {
    pub fn new(value: f32) -> Result<Self, WeightError> {
        if !(0.0..1000.0).contains(&value) {
            return Err(WeightError::OutOfRange);
        }

        if (value * 10.0 % 1.0).abs() > f32::EPSILON {
            return Err(WeightError::InvalidResolution);
        }

        Ok(Self(value))
    }
}

impl TryFrom<&str> for Weight {
    type Error = WeightError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.parse::<f32>() {
            Ok(parsed_value) => Weight::new(parsed_value),
            Err(_) => Err(WeightError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WeightError {
    #[error("Weight must be in the range 0.0 to 999.9 kg")]
    OutOfRange,
    #[error("Weight must be a multiple of 0.1 kg")]
    InvalidResolution,
    #[error("Weight must be a decimal")]
    ParseError,
}

/// Rate of perceived exertion, stored in tenths.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RPE(u8);

impl RPE {
    pub fn new(value: f32) -> Result<Self, RPEError> {
        if !(0.0..=10.0).contains(&value) {
            return Err(RPEError::OutOfRange);
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let v = (value * 10.0).round() as u8;

        if v % 5 != 0 {
            return Err(RPEError::InvalidResolution);
        }

        Ok(Self(v))
    }
}

impl From<RPE> for f32 {
    fn from(value: RPE) -> Self {
        f32::from(value.0) / 10.0
    }
}

impl TryFrom<&str> for RPE {
    type Error = RPEError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.parse::<f32>() {
            Ok(parsed_value) => RPE::new(parsed_value),
            Err(_) => Err(RPEError::ParseError),
        }
    }
}

impl fmt::Display for RPE {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", f32::from(*self))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RPEError {
    #[error("RPE must be in the range 0.0 to 10.0")]
    OutOfRange,
    #[error("RPE must be a multiple of 0.5")]
    InvalidResolution,
    #[error("RPE must be a decimal")]
    ParseError,
}

/// Reps in reserve.
#[derive(Debug, Display, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord)]
pub struct RIR(u8);

impl RIR {
    pub fn new(value: u8) -> Result<Self, RIRError> {
        if value > 10 {
            return Err(RIRError::OutOfRange);
        }

        Ok(Self(value))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RIRError {
    #[error("RIR must be in the range 0 to 10")]
    OutOfRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum WorkoutExerciseType {
    Reps,
    Time,
    Ramping,
}

/// Execution parameters of a workout exercise.
///
/// `reps_or_time` holds the number of reps for [`WorkoutExerciseType::Reps`] and
/// [`WorkoutExerciseType::Ramping`], and seconds for [`WorkoutExerciseType::Time`].
#[derive(Debug, Clone, PartialEq)]
pub struct Prescription {
    pub kind: WorkoutExerciseType,
    pub sets: Sets,
    pub reps_or_time: u32,
    pub rest: Time,
    pub weight: Option<Weight>,
    pub rpe: Option<RPE>,
    pub rir: Option<RIR>,
    pub tut: Option<String>,
    pub note: Option<String>,
}

impl Prescription {
    pub fn new(
        kind: WorkoutExerciseType,
        sets: Sets,
        reps_or_time: u32,
        rest: Time,
    ) -> Result<Self, PrescriptionError> {
        match kind {
            WorkoutExerciseType::Reps | WorkoutExerciseType::Ramping => {
                Reps::new(reps_or_time)?;
            }
            WorkoutExerciseType::Time => {
                Time::new(reps_or_time)?;
            }
        }
        if reps_or_time == 0 {
            return Err(PrescriptionError::Empty);
        }

        Ok(Self {
            kind,
            sets,
            reps_or_time,
            rest,
            weight: None,
            rpe: None,
            rir: None,
            tut: None,
            note: None,
        })
    }

    #[must_use]
    pub fn with_weight(mut self, weight: Weight) -> Self {
        self.weight = Some(weight);
        self
    }

    #[must_use]
    pub fn with_rpe(mut self, rpe: RPE) -> Self {
        self.rpe = Some(rpe);
        self
    }

    #[must_use]
    pub fn with_rir(mut self, rir: RIR) -> Self {
        self.rir = Some(rir);
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: &str) -> Self {
        let note = note.trim();
        self.note = (!note.is_empty()).then(|| note.to_string());
        self
    }

    #[must_use]
    pub fn with_tut(mut self, tut: &str) -> Self {
        let tut = tut.trim();
        self.tut = (!tut.is_empty()).then(|| tut.to_string());
        self
    }

    /// Estimated duration in seconds, assuming 4 s per rep.
    #[must_use]
    pub fn duration(&self) -> u32 {
        let work = match self.kind {
            WorkoutExerciseType::Reps | WorkoutExerciseType::Ramping => self.reps_or_time * 4,
            WorkoutExerciseType::Time => self.reps_or_time,
        };
        u32::from(self.sets) * (work + u32::from(self.rest))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum PrescriptionError {
    #[error(transparent)]
    Reps(#[from] RepsError),
    #[error(transparent)]
    Time(#[from] TimeError),
    #[error("Reps or time must be greater than 0")]
    Empty,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("1", Ok(Sets(1)))]
    #[case("99", Ok(Sets(99)))]
    #[case("0", Err(SetsError::OutOfRange))]
    #[case("100", Err(SetsError::OutOfRange))]
    #[case("4.5", Err(SetsError::ParseError))]
    fn test_sets_try_from_str(#[case] value: &str, #[case] expected: Result<Sets, SetsError>) {
        assert_eq!(Sets::try_from(value), expected);
    }

    #[rstest]
    #[case("0", Ok(Reps(0)))]
    #[case("999", Ok(Reps(999)))]
    #[case("1000", Err(RepsError::OutOfRange))]
    #[case("-1", Err(RepsError::ParseError))]
    fn test_reps_try_from_str(#[case] value: &str, #[case] expected: Result<Reps, RepsError>) {
        assert_eq!(Reps::try_from(value), expected);
    }

    #[rstest]
    #[case("90", Ok(Time(90)))]
    #[case("3600", Err(TimeError::OutOfRange))]
    #[case("1.5", Err(TimeError::ParseError))]
    fn test_time_try_from_str(#[case] value: &str, #[case] expected: Result<Time, TimeError>) {
        assert_eq!(Time::try_from(value), expected);
    }

    #[rstest]
    #[case("42.5", Ok(Weight(42.5)))]
    #[case("1000", Err(WeightError::OutOfRange))]
    #[case("42.55", Err(WeightError::InvalidResolution))]
    #[case("heavy", Err(WeightError::ParseError))]
    fn test_weight_try_from_str(
        #[case] value: &str,
        #[case] expected: Result<Weight, WeightError>,
    ) {
        assert_eq!(Weight::try_from(value), expected);
    }

    #[rstest]
    #[case("8", Ok(RPE(80)))]
    #[case("8.5", Ok(RPE(85)))]
    #[case("8.2", Err(RPEError::InvalidResolution))]
    #[case("11", Err(RPEError::OutOfRange))]
    #[case("", Err(RPEError::ParseError))]
    fn test_rpe_try_from_str(#[case] value: &str, #[case] expected: Result<RPE, RPEError>) {
        assert_eq!(RPE::try_from(value), expected);
    }

    #[test]
    fn test_rpe_display() {
        assert_eq!(RPE::new(7.5).unwrap().to_string(), "7.5");
    }

    #[rstest]
    #[case(0, Ok(RIR(0)))]
    #[case(10, Ok(RIR(10)))]
    #[case(11, Err(RIRError::OutOfRange))]
    fn test_rir_new(#[case] value: u8, #[case] expected: Result<RIR, RIRError>) {
        assert_eq!(RIR::new(value), expected);
    }

    #[rstest]
    #[case(WorkoutExerciseType::Reps, "reps")]
    #[case(WorkoutExerciseType::Time, "time")]
    #[case(WorkoutExerciseType::Ramping, "ramping")]
    fn test_workout_exercise_type_string(#[case] kind: WorkoutExerciseType, #[case] value: &str) {
        assert_eq!(kind.to_string(), value);
        assert_eq!(value.parse::<WorkoutExerciseType>().unwrap(), kind);
    }

    #[rstest]
    #[case(WorkoutExerciseType::Reps, 12, Ok(()))]
    #[case(WorkoutExerciseType::Reps, 1000, Err(PrescriptionError::Reps(RepsError::OutOfRange)))]
    #[case(WorkoutExerciseType::Time, 1200, Ok(()))]
    #[case(WorkoutExerciseType::Time, 3600, Err(PrescriptionError::Time(TimeError::OutOfRange)))]
    #[case(WorkoutExerciseType::Ramping, 0, Err(PrescriptionError::Empty))]
    fn test_prescription_new(
        #[case] kind: WorkoutExerciseType,
        #[case] reps_or_time: u32,
        #[case] expected: Result<(), PrescriptionError>,
    ) {
        assert_eq!(
            Prescription::new(kind, Sets(3), reps_or_time, Time(60)).map(|_| ()),
            expected
        );
    }

    #[rstest]
    #[case(WorkoutExerciseType::Reps, 10, 3 * (40 + 60))]
    #[case(WorkoutExerciseType::Time, 30, 3 * (30 + 60))]
    fn test_prescription_duration(
        #[case] kind: WorkoutExerciseType,
        #[case] reps_or_time: u32,
        #[case] expected: u32,
    ) {
        assert_eq!(
            Prescription::new(kind, Sets(3), reps_or_time, Time(60))
                .unwrap()
                .duration(),
            expected
        );
    }

    #[test]
    fn test_prescription_with_note() {
        let prescription = Prescription::new(WorkoutExerciseType::Reps, Sets(3), 8, Time(90))
            .unwrap()
            .with_note("  keep elbows tucked ")
            .with_tut("");
        assert_eq!(prescription.note, Some("keep elbows tucked".to_string()));
        assert_eq!(prescription.tut, None);
    }
}
