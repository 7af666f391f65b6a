use std::collections::BTreeSet;

use strum::IntoEnumIterator;

use crate::{
    AssetID, CreateError, DeleteError, Name, Page, PageRequest, ReadError, Time, UpdateError,
    ValidationError,
};

id!(ExerciseID);

#[allow(async_fn_in_trait)]
pub trait ExerciseRepository {
    async fn read_exercises(
        &self,
        filter: &ExerciseFilter,
        page: PageRequest,
    ) -> Result<Page<Exercise>, ReadError>;
    async fn read_exercise(&self, id: ExerciseID) -> Result<Exercise, ReadError>;
    async fn create_exercise(&self, draft: ExerciseDraft) -> Result<Exercise, CreateError>;
    async fn modify_exercise(
        &self,
        id: ExerciseID,
        change: ExerciseChange,
    ) -> Result<Exercise, UpdateError>;
    async fn delete_exercise(&self, id: ExerciseID) -> Result<ExerciseID, DeleteError>;
}

#[allow(async_fn_in_trait)]
pub trait ExerciseService {
    async fn get_exercises(
        &self,
        filter: &ExerciseFilter,
        page: PageRequest,
    ) -> Result<Page<Exercise>, ReadError>;
    async fn get_exercise(&self, id: ExerciseID) -> Result<Exercise, ReadError>;
    async fn create_exercise(&self, draft: ExerciseDraft) -> Result<Exercise, CreateError>;
    async fn modify_exercise(
        &self,
        id: ExerciseID,
        change: ExerciseChange,
    ) -> Result<Exercise, UpdateError>;
    async fn delete_exercise(&self, id: ExerciseID) -> Result<ExerciseID, DeleteError>;

    fn validate_exercise_title(&self, title: &str) -> Result<Name, ValidationError> {
        Name::new(title).map_err(|err| ValidationError::Other(err.into()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub id: ExerciseID,
    pub title: Name,
    pub muscle_group: MuscleGroup,
    pub description: String,
    pub video: Option<AssetID>,
    pub duration: Option<Time>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseDraft {
    pub title: Name,
    pub muscle_group: MuscleGroup,
    pub description: String,
    pub video: Option<AssetID>,
    pub duration: Option<Time>,
}

impl ExerciseDraft {
    #[must_use]
    pub fn into_exercise(self, id: ExerciseID) -> Exercise {
        Exercise {
            id,
            title: self.title,
            muscle_group: self.muscle_group,
            description: self.description,
            video: self.video,
            duration: self.duration,
        }
    }
}

/// Partial update of an exercise. Fields set to `None` stay unchanged.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExerciseChange {
    pub title: Option<Name>,
    pub muscle_group: Option<MuscleGroup>,
    pub description: Option<String>,
    pub duration: Option<Option<Time>>,
    pub video: VideoChange,
}

impl ExerciseChange {
    pub fn apply(self, exercise: &mut Exercise) {
        if let Some(title) = self.title {
            exercise.title = title;
        }
        if let Some(muscle_group) = self.muscle_group {
            exercise.muscle_group = muscle_group;
        }
        if let Some(description) = self.description {
            exercise.description = description;
        }
        if let Some(duration) = self.duration {
            exercise.duration = duration;
        }
        exercise.video = self.video.apply(exercise.video);
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum VideoChange {
    #[default]
    Unchanged,
    Replaced(AssetID),
    Cleared,
}

impl VideoChange {
    #[must_use]
    pub fn apply(self, current: Option<AssetID>) -> Option<AssetID> {
        match self {
            VideoChange::Unchanged => current,
            VideoChange::Replaced(asset_id) => Some(asset_id),
            VideoChange::Cleared => None,
        }
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    PartialOrd,
    Ord,
    strum::AsRefStr,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum MuscleGroup {
    Chest,
    Back,
    Shoulders,
    Biceps,
    Triceps,
    Forearms,
    Core,
    Glutes,
    Quads,
    Hamstrings,
    Calves,
    FullBody,
    Cardio,
}

impl MuscleGroup {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            MuscleGroup::Chest => "Chest",
            MuscleGroup::Back => "Back",
            MuscleGroup::Shoulders => "Shoulders",
            MuscleGroup::Biceps => "Biceps",
            MuscleGroup::Triceps => "Triceps",
            MuscleGroup::Forearms => "Forearms",
            MuscleGroup::Core => "Core",
            MuscleGroup::Glutes => "Glutes",
            MuscleGroup::Quads => "Quads",
            MuscleGroup::Hamstrings => "Hamstrings",
            MuscleGroup::Calves => "Calves",
            MuscleGroup::FullBody => "Full Body",
            MuscleGroup::Cardio => "Cardio",
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct ExerciseFilter {
    pub search: String,
    pub muscle_groups: BTreeSet<MuscleGroup>,
}

impl ExerciseFilter {
    #[must_use]
    pub fn matches(&self, exercise: &Exercise) -> bool {
        exercise
            .title
            .as_str()
            .to_lowercase()
            .contains(self.search.to_lowercase().trim())
            && (self.muscle_groups.is_empty()
                || self.muscle_groups.contains(&exercise.muscle_group))
    }

    #[must_use]
    pub fn exercises<'a>(
        &self,
        exercises: impl Iterator<Item = &'a Exercise>,
    ) -> Vec<&'a Exercise> {
        let mut result = exercises.filter(|e| self.matches(e)).collect::<Vec<_>>();
        result.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        result
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty() && self.muscle_groups.is_empty()
    }

    #[must_use]
    pub fn muscle_group_list(&self) -> Vec<(MuscleGroup, bool)> {
        MuscleGroup::iter()
            .map(|m| (m, self.muscle_groups.contains(&m)))
            .collect::<Vec<_>>()
    }

    pub fn toggle_muscle_group(&mut self, muscle_group: MuscleGroup) {
        if self.muscle_groups.contains(&muscle_group) {
            self.muscle_groups.remove(&muscle_group);
        } else {
            self.muscle_groups.insert(muscle_group);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn exercise(id: u128, title: &str, muscle_group: MuscleGroup) -> Exercise {
        Exercise {
            id: id.into(),
            title: Name::new(title).unwrap(),
            muscle_group,
            description: String::new(),
            video: None,
            duration: None,
        }
    }

    #[rstest]
    #[case(VideoChange::Unchanged, Some(AssetID::from(1)), Some(AssetID::from(1)))]
    #[case(VideoChange::Unchanged, None, None)]
    #[case(
        VideoChange::Replaced(AssetID::from(2)),
        Some(AssetID::from(1)),
        Some(AssetID::from(2))
    )]
    #[case(VideoChange::Replaced(AssetID::from(2)), None, Some(AssetID::from(2)))]
    #[case(VideoChange::Cleared, Some(AssetID::from(1)), None)]
    fn test_video_change_apply(
        #[case] change: VideoChange,
        #[case] current: Option<AssetID>,
        #[case] expected: Option<AssetID>,
    ) {
        assert_eq!(change.apply(current), expected);
    }

    #[test]
    fn test_exercise_change_apply() {
        let mut e = exercise(1, "Squat", MuscleGroup::Quads);
        e.video = Some(AssetID::from(7));
        ExerciseChange {
            description: Some("Back squat".to_string()),
            duration: Some(Some(Time::new(45).unwrap())),
            video: VideoChange::Cleared,
            ..ExerciseChange::default()
        }
        .apply(&mut e);
        assert_eq!(
            e,
            Exercise {
                id: 1.into(),
                title: Name::new("Squat").unwrap(),
                muscle_group: MuscleGroup::Quads,
                description: "Back squat".to_string(),
                video: None,
                duration: Some(Time::new(45).unwrap()),
            }
        );
    }

    #[rstest]
    #[case("", &[], vec![3, 1, 2])]
    #[case("SQU", &[], vec![3])]
    #[case(" press ", &[], vec![1, 2])]
    #[case("", &[MuscleGroup::Shoulders], vec![2])]
    #[case("press", &[MuscleGroup::Chest, MuscleGroup::Shoulders], vec![1, 2])]
    #[case("row", &[], vec![])]
    fn test_exercise_filter_exercises(
        #[case] search: &str,
        #[case] muscle_groups: &[MuscleGroup],
        #[case] expected: Vec<u128>,
    ) {
        let exercises = [
            exercise(1, "Bench Press", MuscleGroup::Chest),
            exercise(2, "Overhead Press", MuscleGroup::Shoulders),
            exercise(3, "Back Squat", MuscleGroup::Quads),
        ];
        let filter = ExerciseFilter {
            search: search.to_string(),
            muscle_groups: muscle_groups.iter().copied().collect(),
        };
        assert_eq!(
            filter
                .exercises(exercises.iter())
                .iter()
                .map(|e| e.id)
                .collect::<Vec<_>>(),
            expected.into_iter().map(ExerciseID::from).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_exercise_filter_toggle_muscle_group() {
        let mut filter = ExerciseFilter::default();
        assert!(filter.is_empty());
        filter.toggle_muscle_group(MuscleGroup::Back);
        assert!(!filter.is_empty());
        assert!(
            filter
                .muscle_group_list()
                .contains(&(MuscleGroup::Back, true))
        );
        filter.toggle_muscle_group(MuscleGroup::Back);
        assert!(filter.is_empty());
    }

    #[rstest]
    #[case(MuscleGroup::FullBody, "full_body", "Full Body")]
    #[case(MuscleGroup::Chest, "chest", "Chest")]
    fn test_muscle_group_names(
        #[case] muscle_group: MuscleGroup,
        #[case] value: &str,
        #[case] name: &str,
    ) {
        assert_eq!(muscle_group.as_ref(), value);
        assert_eq!(value.parse::<MuscleGroup>().unwrap(), muscle_group);
        assert_eq!(muscle_group.name(), name);
    }
}
