use std::collections::{BTreeMap, BTreeSet};

use crate::{UpdateError, WorkoutExercise, WorkoutExerciseID};

/// Checks that linking `id` to `partner` keeps the supersets of a day valid.
///
/// `exercises` must be all exercises of the day containing `id`. Unlinking (`partner` is
/// `None`) is always valid.
pub fn check_superset(
    exercises: &[WorkoutExercise],
    id: WorkoutExerciseID,
    partner: Option<WorkoutExerciseID>,
) -> Result<(), SupersetError> {
    let links = exercises
        .iter()
        .map(|e| (e.id, if e.id == id { partner } else { e.superset }))
        .collect::<BTreeMap<_, _>>();

    if !links.contains_key(&id) {
        return Err(SupersetError::OutsideDay(id));
    }

    check_links(&links)
}

/// Checks all superset links of a day.
pub fn validate_supersets(exercises: &[WorkoutExercise]) -> Result<(), SupersetError> {
    check_links(
        &exercises
            .iter()
            .map(|e| (e.id, e.superset))
            .collect::<BTreeMap<_, _>>(),
    )
}

fn check_links(
    links: &BTreeMap<WorkoutExerciseID, Option<WorkoutExerciseID>>,
) -> Result<(), SupersetError> {
    for (id, partner) in links {
        if let Some(partner) = partner {
            if partner == id {
                return Err(SupersetError::SelfReference(*id));
            }
            if !links.contains_key(partner) {
                return Err(SupersetError::OutsideDay(*partner));
            }
        }
    }

    for start in links.keys() {
        let mut visited = BTreeSet::from([*start]);
        let mut current = *start;
        while let Some(Some(next)) = links.get(&current) {
            if !visited.insert(*next) {
                return Err(SupersetError::Cycle(*start));
            }
            current = *next;
        }
    }

    Ok(())
}

/// Groups the exercises of a day into chains of linked exercises, in execution order.
///
/// An exercise that is neither linked nor linked to forms a group of its own.
#[must_use]
pub fn superset_groups(exercises: &[WorkoutExercise]) -> Vec<Vec<WorkoutExerciseID>> {
    let mut sorted = exercises.iter().collect::<Vec<_>>();
    sorted.sort_by_key(|e| e.order);

    let linked_to = sorted
        .iter()
        .filter_map(|e| e.superset)
        .collect::<BTreeSet<_>>();
    let links = sorted
        .iter()
        .map(|e| (e.id, e.superset))
        .collect::<BTreeMap<_, _>>();

    let mut grouped = BTreeSet::new();
    let mut groups = vec![];

    for exercise in &sorted {
        if linked_to.contains(&exercise.id) || grouped.contains(&exercise.id) {
            continue;
        }
        let mut group = vec![exercise.id];
        grouped.insert(exercise.id);
        let mut current = exercise.id;
        while let Some(Some(next)) = links.get(&current) {
            if !grouped.insert(*next) {
                break;
            }
            group.push(*next);
            current = *next;
        }
        groups.push(group);
    }

    for exercise in &sorted {
        if !grouped.contains(&exercise.id) {
            grouped.insert(exercise.id);
            groups.push(vec![exercise.id]);
        }
    }

    groups
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SupersetError {
    #[error("exercise {0} cannot form a superset with itself")]
    SelfReference(WorkoutExerciseID),
    #[error("exercise {0} is not part of the same day")]
    OutsideDay(WorkoutExerciseID),
    #[error("superset starting at exercise {0} forms a cycle")]
    Cycle(WorkoutExerciseID),
}

impl From<SupersetError> for UpdateError {
    fn from(value: SupersetError) -> Self {
        UpdateError::InvalidInput(value.to_string())
    }
}
