//! REST
//!
//! Adapter for the JSON API of the coaching backend. The backend is the authority for all
//! invariants, rejected requests are mapped onto the domain error taxonomy. The transport is
//! pluggable through [`SendRequest`].

use std::{collections::BTreeMap, convert::Infallible};

use chrono::{DateTime, TimeDelta, Utc};
use coach_domain as domain;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, json};
use uuid::Uuid;

#[allow(async_fn_in_trait)]
pub trait SendRequest {
    async fn send_request(&self, request: Request) -> Result<Response, SendError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl Request {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: vec![],
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    #[must_use]
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    #[must_use]
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json<T: Serialize>(status: u16, body: &T) -> Self {
        Self::new(status, serde_json::to_string(body).unwrap_or_default())
    }

    #[must_use]
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SendError {
    #[error("no connection")]
    NoConnection,
    #[error("{0}")]
    Other(String),
}

#[derive(Clone)]
pub struct ReqwestSendRequest {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestSendRequest {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl SendRequest for ReqwestSendRequest {
    async fn send_request(&self, request: Request) -> Result<Response, SendError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };
        let url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            request.path
        );
        let mut builder = self.client.request(method, url).query(&request.query);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        let response = builder.send().await.map_err(|err| {
            if err.is_connect() || err.is_timeout() {
                SendError::NoConnection
            } else {
                SendError::Other(err.to_string())
            }
        })?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| SendError::Other(err.to_string()))?;
        Ok(Response { status, body })
    }
}

#[derive(Clone)]
pub struct REST<S: SendRequest> {
    pub sender: S,
}

impl REST<ReqwestSendRequest> {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            sender: ReqwestSendRequest::new(base_url),
        }
    }
}

impl<S: SendRequest> REST<S> {
    async fn fetch<T: DeserializeOwned>(&self, request: Request) -> Result<T, FetchError> {
        let response = self.sender.send_request(request).await?;
        if !response.ok() {
            return Err(FetchError::Status {
                status: response.status,
                body: response.body,
            });
        }
        Ok(serde_json::from_str(&response.body)?)
    }

    async fn fetch_no_content<T>(&self, request: Request, result: T) -> Result<T, FetchError> {
        let response = self.sender.send_request(request).await?;
        if !response.ok() {
            return Err(FetchError::Status {
                status: response.status,
                body: response.body,
            });
        }
        Ok(result)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("no connection")]
    NoConnection,
    #[error("{0}")]
    Send(String),
    #[error("{status} {body}")]
    Status { status: u16, body: String },
    #[error("deserialization failed: {0}")]
    Deserialization(#[from] serde_json::Error),
    #[error(transparent)]
    InvalidData(#[from] InvalidData),
}

impl FetchError {
    fn is_conflict(&self) -> bool {
        matches!(self, FetchError::Status { status: 409, .. })
    }
}

impl From<SendError> for FetchError {
    fn from(value: SendError) -> Self {
        match value {
            SendError::NoConnection => FetchError::NoConnection,
            SendError::Other(message) => FetchError::Send(message),
        }
    }
}

#[derive(thiserror::Error, Debug)]
#[error("invalid {field}: {message}")]
pub struct InvalidData {
    field: &'static str,
    message: String,
}

impl From<Infallible> for InvalidData {
    fn from(value: Infallible) -> Self {
        match value {}
    }
}

fn invalid<E: std::fmt::Display>(field: &'static str) -> impl FnOnce(E) -> InvalidData {
    move |err| InvalidData {
        field,
        message: err.to_string(),
    }
}

fn storage_error(err: FetchError) -> domain::StorageError {
    match err {
        FetchError::NoConnection => domain::StorageError::NoConnection,
        FetchError::Status {
            status: 401 | 403, ..
        } => domain::StorageError::NoSession,
        err => domain::StorageError::Other(Box::new(err)),
    }
}

impl From<FetchError> for domain::ReadError {
    fn from(value: FetchError) -> Self {
        match value {
            FetchError::Status { status: 404, .. } => domain::ReadError::NotFound,
            err => domain::ReadError::Storage(storage_error(err)),
        }
    }
}

impl From<FetchError> for domain::CreateError {
    fn from(value: FetchError) -> Self {
        match value {
            FetchError::Status { status: 404, .. } => domain::CreateError::NotFound,
            FetchError::Status { status: 409, .. } => domain::CreateError::Conflict,
            FetchError::Status {
                status: 400 | 422,
                body,
            } => domain::CreateError::InvalidInput(body),
            err => domain::CreateError::Storage(storage_error(err)),
        }
    }
}

impl From<FetchError> for domain::UpdateError {
    fn from(value: FetchError) -> Self {
        match value {
            FetchError::Status { status: 404, .. } => domain::UpdateError::NotFound,
            FetchError::Status { status: 409, .. } => domain::UpdateError::Conflict,
            FetchError::Status {
                status: 400 | 422,
                body,
            } => domain::UpdateError::InvalidInput(body),
            err => domain::UpdateError::Storage(storage_error(err)),
        }
    }
}

impl From<FetchError> for domain::DeleteError {
    fn from(value: FetchError) -> Self {
        match value {
            FetchError::Status { status: 404, .. } => domain::DeleteError::NotFound,
            FetchError::Status { status: 409, .. } => domain::DeleteError::InUse,
            err => domain::DeleteError::Storage(storage_error(err)),
        }
    }
}

impl From<InvalidData> for domain::ReadError {
    fn from(value: InvalidData) -> Self {
        FetchError::from(value).into()
    }
}

impl From<InvalidData> for domain::CreateError {
    fn from(value: InvalidData) -> Self {
        FetchError::from(value).into()
    }
}

impl From<InvalidData> for domain::UpdateError {
    fn from(value: InvalidData) -> Self {
        FetchError::from(value).into()
    }
}

fn try_collect<T, D>(items: Vec<T>) -> Result<Vec<D>, InvalidData>
where
    T: TryInto<D>,
    InvalidData: From<T::Error>,
{
    items
        .into_iter()
        .map(|item| item.try_into().map_err(InvalidData::from))
        .collect()
}

impl<S: SendRequest> domain::ProgramRepository for REST<S> {
    async fn read_programs(&self) -> Result<Vec<domain::Program>, domain::ReadError> {
        let programs: Vec<Program> = self.fetch(Request::get("api/programs")).await?;
        Ok(try_collect(programs)?)
    }

    async fn read_program_tree(
        &self,
        id: domain::ProgramID,
    ) -> Result<domain::ProgramTree, domain::ReadError> {
        let tree: ProgramTree = self
            .fetch(Request::get(format!("api/programs/{}", *id)))
            .await?;
        Ok(tree.try_into()?)
    }

    async fn create_program(
        &self,
        title: domain::Name,
        description: String,
        program_type: domain::ProgramType,
    ) -> Result<domain::Program, domain::CreateError> {
        let program: Program = self
            .fetch(Request::post("api/programs").json(json!({
                "title": title.as_str(),
                "description": description,
                "program_type": program_type.to_string(),
            })))
            .await?;
        Ok(program.try_into()?)
    }

    async fn modify_program(
        &self,
        id: domain::ProgramID,
        title: Option<domain::Name>,
        description: Option<String>,
        program_type: Option<domain::ProgramType>,
    ) -> Result<domain::Program, domain::UpdateError> {
        let mut content = Map::new();
        if let Some(title) = title {
            content.insert("title".into(), json!(title.as_str()));
        }
        if let Some(description) = description {
            content.insert("description".into(), json!(description));
        }
        if let Some(program_type) = program_type {
            content.insert("program_type".into(), json!(program_type.to_string()));
        }
        let program: Program = self
            .fetch(Request::patch(format!("api/programs/{}", *id)).json(content.into()))
            .await?;
        Ok(program.try_into()?)
    }

    async fn delete_program(
        &self,
        id: domain::ProgramID,
    ) -> Result<domain::ProgramID, domain::DeleteError> {
        Ok(self
            .fetch_no_content(Request::delete(format!("api/programs/{}", *id)), id)
            .await?)
    }
}

impl<S: SendRequest> domain::OrderingRepository for REST<S> {
    async fn create_next_week(
        &self,
        program_id: domain::ProgramID,
    ) -> Result<domain::Week, domain::CreateError> {
        let week: Week = self
            .fetch(Request::post(format!("api/programs/{}/weeks", *program_id)))
            .await?;
        Ok(week.try_into()?)
    }

    async fn delete_week(&self, id: domain::WeekID) -> Result<domain::WeekID, domain::DeleteError> {
        Ok(self
            .fetch_no_content(Request::delete(format!("api/weeks/{}", *id)), id)
            .await?)
    }

    async fn create_day(
        &self,
        week_id: domain::WeekID,
        day_of_week: domain::DayOfWeek,
        title: String,
    ) -> Result<domain::Day, domain::CreateError> {
        let day: Day = self
            .fetch(
                Request::post(format!("api/weeks/{}/days", *week_id)).json(json!({
                    "day_of_week": u8::from(day_of_week),
                    "title": title,
                })),
            )
            .await
            .map_err(|err| {
                if err.is_conflict() {
                    domain::CreateError::DaySlotTaken(day_of_week)
                } else {
                    err.into()
                }
            })?;
        Ok(day.try_into()?)
    }

    async fn modify_day(
        &self,
        id: domain::DayID,
        title: Option<String>,
        day_of_week: Option<domain::DayOfWeek>,
    ) -> Result<domain::Day, domain::UpdateError> {
        let mut content = Map::new();
        if let Some(title) = title {
            content.insert("title".into(), json!(title));
        }
        if let Some(day_of_week) = day_of_week {
            content.insert("day_of_week".into(), json!(u8::from(day_of_week)));
        }
        let day: Day = self
            .fetch(Request::patch(format!("api/days/{}", *id)).json(content.into()))
            .await
            .map_err(|err| match day_of_week {
                Some(day_of_week) if err.is_conflict() => {
                    domain::UpdateError::DaySlotTaken(day_of_week)
                }
                _ => err.into(),
            })?;
        Ok(day.try_into()?)
    }

    async fn delete_day(&self, id: domain::DayID) -> Result<domain::DayID, domain::DeleteError> {
        Ok(self
            .fetch_no_content(Request::delete(format!("api/days/{}", *id)), id)
            .await?)
    }

    async fn create_workout_exercise(
        &self,
        day_id: domain::DayID,
        exercise_id: domain::ExerciseID,
        prescription: domain::Prescription,
    ) -> Result<domain::WorkoutExercise, domain::CreateError> {
        let mut content = prescription_content(prescription);
        content.insert("exercise_id".into(), json!(*exercise_id));
        let workout_exercise: WorkoutExercise = self
            .fetch(
                Request::post(format!("api/days/{}/workout_exercises", *day_id))
                    .json(content.into()),
            )
            .await?;
        Ok(workout_exercise.try_into()?)
    }

    async fn modify_workout_exercise(
        &self,
        id: domain::WorkoutExerciseID,
        prescription: domain::Prescription,
    ) -> Result<domain::WorkoutExercise, domain::UpdateError> {
        let workout_exercise: WorkoutExercise = self
            .fetch(
                Request::patch(format!("api/workout_exercises/{}", *id))
                    .json(prescription_content(prescription).into()),
            )
            .await?;
        Ok(workout_exercise.try_into()?)
    }

    async fn set_superset(
        &self,
        id: domain::WorkoutExerciseID,
        partner: Option<domain::WorkoutExerciseID>,
    ) -> Result<domain::WorkoutExercise, domain::UpdateError> {
        let workout_exercise: WorkoutExercise = self
            .fetch(
                Request::put(format!("api/workout_exercises/{}/superset", *id))
                    .json(json!({ "superset": partner.map(|p| *p) })),
            )
            .await?;
        Ok(workout_exercise.try_into()?)
    }

    async fn reorder_workout_exercises(
        &self,
        day_id: domain::DayID,
        ids: Vec<domain::WorkoutExerciseID>,
    ) -> Result<BTreeMap<domain::WorkoutExerciseID, u32>, domain::UpdateError> {
        let order: Vec<Order> = self
            .fetch(
                Request::put(format!("api/days/{}/order", *day_id)).json(json!({
                    "workout_exercise_ids": ids.iter().map(|id| **id).collect::<Vec<_>>(),
                })),
            )
            .await?;
        Ok(order.into_iter().map(|o| (o.id.into(), o.order)).collect())
    }

    async fn delete_workout_exercise(
        &self,
        id: domain::WorkoutExerciseID,
    ) -> Result<domain::WorkoutExerciseID, domain::DeleteError> {
        Ok(self
            .fetch_no_content(
                Request::delete(format!("api/workout_exercises/{}", *id)),
                id,
            )
            .await?)
    }
}

fn prescription_content(prescription: domain::Prescription) -> Map<String, serde_json::Value> {
    match serde_json::to_value(Prescription::from(prescription)) {
        Ok(serde_json::Value::Object(map)) => map,
        _ => Map::new(),
    }
}

impl<S: SendRequest> domain::CloneRepository for REST<S> {
    async fn clone_program(
        &self,
        source_id: domain::ProgramID,
        title: domain::Name,
    ) -> Result<domain::ProgramTree, domain::CreateError> {
        let tree: ProgramTree = self
            .fetch(
                Request::post(format!("api/programs/{}/clone", *source_id))
                    .json(json!({ "title": title.as_str() })),
            )
            .await?;
        Ok(tree.try_into()?)
    }

    async fn duplicate_week(
        &self,
        week_id: domain::WeekID,
        destination: domain::WeekOrder,
        program_id: domain::ProgramID,
    ) -> Result<domain::WeekTree, domain::CreateError> {
        let week: WeekTree = self
            .fetch(
                Request::post(format!("api/weeks/{}/duplicate", *week_id)).json(json!({
                    "program_id": *program_id,
                    "order": u32::from(destination),
                })),
            )
            .await
            .map_err(|err| {
                if err.is_conflict() {
                    domain::CreateError::WeekSlotTaken(destination)
                } else {
                    err.into()
                }
            })?;
        Ok(week.try_into()?)
    }

    async fn clone_day(
        &self,
        source_week_id: domain::WeekID,
        source_day_of_week: domain::DayOfWeek,
        destination_week_id: domain::WeekID,
        destination_day_of_week: domain::DayOfWeek,
    ) -> Result<domain::DayTree, domain::CreateError> {
        let day: DayTree = self
            .fetch(
                Request::post(format!(
                    "api/weeks/{}/days/{}/clone",
                    *source_week_id, source_day_of_week
                ))
                .json(json!({
                    "week_id": *destination_week_id,
                    "day_of_week": u8::from(destination_day_of_week),
                })),
            )
            .await
            .map_err(|err| {
                if err.is_conflict() {
                    domain::CreateError::DaySlotTaken(destination_day_of_week)
                } else {
                    err.into()
                }
            })?;
        Ok(day.try_into()?)
    }

    async fn copy_workout_exercise(
        &self,
        id: domain::WorkoutExerciseID,
        destination_day_id: domain::DayID,
    ) -> Result<domain::WorkoutExercise, domain::CreateError> {
        let workout_exercise: WorkoutExercise = self
            .fetch(
                Request::post(format!("api/workout_exercises/{}/copy", *id))
                    .json(json!({ "day_id": *destination_day_id })),
            )
            .await?;
        Ok(workout_exercise.try_into()?)
    }
}

impl<S: SendRequest> domain::AssignmentRepository for REST<S> {
    async fn read_assignments(
        &self,
        program_id: domain::ProgramID,
    ) -> Result<Vec<domain::Assignment>, domain::ReadError> {
        let assignments: Vec<Assignment> = self
            .fetch(Request::get(format!(
                "api/programs/{}/assignments",
                *program_id
            )))
            .await?;
        Ok(assignments.into_iter().map(Into::into).collect())
    }

    async fn read_user_assignments(
        &self,
        user_id: domain::UserID,
    ) -> Result<Vec<domain::Assignment>, domain::ReadError> {
        let assignments: Vec<Assignment> = self
            .fetch(Request::get(format!("api/users/{}/assignments", *user_id)))
            .await?;
        Ok(assignments.into_iter().map(Into::into).collect())
    }

    async fn create_assignment(
        &self,
        user_id: domain::UserID,
        program_id: domain::ProgramID,
        valid_for: Option<TimeDelta>,
    ) -> Result<domain::Assignment, domain::CreateError> {
        let assignment: Assignment = self
            .fetch(Request::post("api/assignments").json(json!({
                "user_id": *user_id,
                "program_id": *program_id,
                "valid_for_seconds": valid_for.map(|d| d.num_seconds()),
            })))
            .await
            .map_err(|err| {
                if err.is_conflict() {
                    domain::CreateError::UserHasActiveProgram(user_id)
                } else {
                    err.into()
                }
            })?;
        Ok(assignment.into())
    }

    async fn delete_assignment(
        &self,
        id: domain::AssignmentID,
    ) -> Result<domain::AssignmentID, domain::DeleteError> {
        self.fetch_no_content(Request::delete(format!("api/assignments/{}", *id)), id)
            .await
            .map_err(|err| {
                if err.is_conflict() {
                    domain::DeleteError::AssignmentCompleted(id)
                } else {
                    err.into()
                }
            })
    }
}

impl<S: SendRequest> domain::ExerciseRepository for REST<S> {
    async fn read_exercises(
        &self,
        filter: &domain::ExerciseFilter,
        page: domain::PageRequest,
    ) -> Result<domain::Page<domain::Exercise>, domain::ReadError> {
        let mut request = Request::get("api/exercises")
            .query("page", page.page)
            .query("page_size", page.page_size);
        if !filter.search.trim().is_empty() {
            request = request.query("search", filter.search.trim());
        }
        if !filter.muscle_groups.is_empty() {
            request = request.query(
                "muscle_groups",
                filter
                    .muscle_groups
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(","),
            );
        }
        let page: Page<Exercise> = self.fetch(request).await?;
        Ok(page.try_into()?)
    }

    async fn read_exercise(
        &self,
        id: domain::ExerciseID,
    ) -> Result<domain::Exercise, domain::ReadError> {
        let exercise: Exercise = self
            .fetch(Request::get(format!("api/exercises/{}", *id)))
            .await?;
        Ok(exercise.try_into()?)
    }

    async fn create_exercise(
        &self,
        draft: domain::ExerciseDraft,
    ) -> Result<domain::Exercise, domain::CreateError> {
        let exercise: Exercise = self
            .fetch(Request::post("api/exercises").json(json!({
                "title": draft.title.as_str(),
                "muscle_group": draft.muscle_group.to_string(),
                "description": draft.description,
                "video": draft.video.map(|v| *v),
                "duration": draft.duration.map(u32::from),
            })))
            .await?;
        Ok(exercise.try_into()?)
    }

    async fn modify_exercise(
        &self,
        id: domain::ExerciseID,
        change: domain::ExerciseChange,
    ) -> Result<domain::Exercise, domain::UpdateError> {
        let mut content = Map::new();
        if let Some(title) = change.title {
            content.insert("title".into(), json!(title.as_str()));
        }
        if let Some(muscle_group) = change.muscle_group {
            content.insert("muscle_group".into(), json!(muscle_group.to_string()));
        }
        if let Some(description) = change.description {
            content.insert("description".into(), json!(description));
        }
        if let Some(duration) = change.duration {
            content.insert("duration".into(), json!(duration.map(u32::from)));
        }
        match change.video {
            domain::VideoChange::Unchanged => {}
            domain::VideoChange::Replaced(video) => {
                content.insert("video".into(), json!(*video));
            }
            domain::VideoChange::Cleared => {
                content.insert("video".into(), serde_json::Value::Null);
            }
        }
        let exercise: Exercise = self
            .fetch(Request::patch(format!("api/exercises/{}", *id)).json(content.into()))
            .await?;
        Ok(exercise.try_into()?)
    }

    async fn delete_exercise(
        &self,
        id: domain::ExerciseID,
    ) -> Result<domain::ExerciseID, domain::DeleteError> {
        Ok(self
            .fetch_no_content(Request::delete(format!("api/exercises/{}", *id)), id)
            .await?)
    }
}

impl<S: SendRequest> domain::UserRepository for REST<S> {
    async fn read_available_users(
        &self,
        filter: &domain::UserFilter,
        page: domain::PageRequest,
    ) -> Result<domain::Page<domain::User>, domain::ReadError> {
        let mut request = Request::get("api/users/available")
            .query("page", page.page)
            .query("page_size", page.page_size);
        if !filter.search.trim().is_empty() {
            request = request.query("search", filter.search.trim());
        }
        let page: Page<User> = self.fetch(request).await?;
        Ok(page.try_into()?)
    }

    async fn read_user(&self, id: domain::UserID) -> Result<domain::User, domain::ReadError> {
        let user: User = self
            .fetch(Request::get(format!("api/users/{}", *id)))
            .await?;
        Ok(user.into())
    }
}

impl<S: SendRequest> domain::AssetRepository for REST<S> {
    async fn upload_asset(
        &self,
        file_name: &str,
        content: Vec<u8>,
    ) -> Result<domain::AssetID, domain::CreateError> {
        let asset: Asset = self
            .fetch(Request::post("api/assets").json(json!({
                "file_name": file_name,
                "content": content,
            })))
            .await?;
        Ok(asset.id.into())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Program {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub program_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<domain::Program> for Program {
    fn from(value: domain::Program) -> Self {
        Self {
            id: *value.id,
            title: value.title.to_string(),
            description: value.description,
            program_type: value.program_type.to_string(),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl TryFrom<Program> for domain::Program {
    type Error = InvalidData;

    fn try_from(value: Program) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            title: domain::Name::new(&value.title).map_err(invalid("title"))?,
            description: value.description,
            program_type: value
                .program_type
                .parse::<domain::ProgramType>()
                .map_err(invalid("program type"))?,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProgramTree {
    #[serde(flatten)]
    pub program: Program,
    pub weeks: Vec<WeekTree>,
}

impl From<domain::ProgramTree> for ProgramTree {
    fn from(value: domain::ProgramTree) -> Self {
        Self {
            program: value.program.into(),
            weeks: value.weeks.into_iter().map(Into::into).collect(),
        }
    }
}

impl TryFrom<ProgramTree> for domain::ProgramTree {
    type Error = InvalidData;

    fn try_from(value: ProgramTree) -> Result<Self, Self::Error> {
        let mut weeks: Vec<domain::WeekTree> = try_collect(value.weeks)?;
        weeks.sort_by_key(|w| w.week.order);
        let tree = Self {
            program: value.program.try_into()?,
            weeks,
        };
        tree.validate().map_err(invalid("program"))?;
        Ok(tree)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Week {
    pub id: Uuid,
    pub program_id: Uuid,
    pub order: u32,
}

impl From<domain::Week> for Week {
    fn from(value: domain::Week) -> Self {
        Self {
            id: *value.id,
            program_id: *value.program_id,
            order: value.order.into(),
        }
    }
}

impl TryFrom<Week> for domain::Week {
    type Error = InvalidData;

    fn try_from(value: Week) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            program_id: value.program_id.into(),
            order: domain::WeekOrder::new(value.order).map_err(invalid("week order"))?,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WeekTree {
    #[serde(flatten)]
    pub week: Week,
    pub days: Vec<DayTree>,
}

impl From<domain::WeekTree> for WeekTree {
    fn from(value: domain::WeekTree) -> Self {
        Self {
            week: value.week.into(),
            days: value.days.into_iter().map(Into::into).collect(),
        }
    }
}

impl TryFrom<WeekTree> for domain::WeekTree {
    type Error = InvalidData;

    fn try_from(value: WeekTree) -> Result<Self, Self::Error> {
        let mut days: Vec<domain::DayTree> = try_collect(value.days)?;
        days.sort_by_key(|d| d.day.day_of_week);
        Ok(Self {
            week: value.week.try_into()?,
            days,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Day {
    pub id: Uuid,
    pub week_id: Uuid,
    pub day_of_week: u8,
    pub title: String,
}

impl From<domain::Day> for Day {
    fn from(value: domain::Day) -> Self {
        Self {
            id: *value.id,
            week_id: *value.week_id,
            day_of_week: value.day_of_week.into(),
            title: value.title,
        }
    }
}

impl TryFrom<Day> for domain::Day {
    type Error = InvalidData;

    fn try_from(value: Day) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            week_id: value.week_id.into(),
            day_of_week: domain::DayOfWeek::new(value.day_of_week)
                .map_err(invalid("day of week"))?,
            title: value.title,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DayTree {
    #[serde(flatten)]
    pub day: Day,
    pub workout_exercises: Vec<WorkoutExercise>,
}

impl From<domain::DayTree> for DayTree {
    fn from(value: domain::DayTree) -> Self {
        Self {
            day: value.day.into(),
            workout_exercises: value.exercises.into_iter().map(Into::into).collect(),
        }
    }
}

impl TryFrom<DayTree> for domain::DayTree {
    type Error = InvalidData;

    fn try_from(value: DayTree) -> Result<Self, Self::Error> {
        let mut exercises: Vec<domain::WorkoutExercise> = try_collect(value.workout_exercises)?;
        exercises.sort_by_key(|e| e.order);
        Ok(Self {
            day: value.day.try_into()?,
            exercises,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Prescription {
    #[serde(rename = "type")]
    pub kind: String,
    pub sets: u32,
    pub reps_or_time: u32,
    pub rest: u32,
    pub weight: Option<f32>,
    pub rpe: Option<f32>,
    pub rir: Option<u8>,
    pub tut: Option<String>,
    pub note: Option<String>,
}

impl From<domain::Prescription> for Prescription {
    fn from(value: domain::Prescription) -> Self {
        Self {
            kind: value.kind.to_string(),
            sets: value.sets.into(),
            reps_or_time: value.reps_or_time,
            rest: value.rest.into(),
            weight: value.weight.map(f32::from),
            rpe: value.rpe.map(f32::from),
            rir: value.rir.map(u8::from),
            tut: value.tut,
            note: value.note,
        }
    }
}

impl TryFrom<Prescription> for domain::Prescription {
    type Error = InvalidData;

    fn try_from(value: Prescription) -> Result<Self, Self::Error> {
        let mut prescription = domain::Prescription::new(
            value
                .kind
                .parse::<domain::WorkoutExerciseType>()
                .map_err(invalid("type"))?,
            domain::Sets::new(value.sets).map_err(invalid("sets"))?,
            value.reps_or_time,
            domain::Time::new(value.rest).map_err(invalid("rest"))?,
        )
        .map_err(invalid("reps or time"))?;
        if let Some(weight) = value.weight {
            prescription =
                prescription.with_weight(domain::Weight::new(weight).map_err(invalid("weight"))?);
        }
        if let Some(rpe) = value.rpe {
            prescription = prescription.with_rpe(domain::RPE::new(rpe).map_err(invalid("rpe"))?);
        }
        if let Some(rir) = value.rir {
            prescription = prescription.with_rir(domain::RIR::new(rir).map_err(invalid("rir"))?);
        }
        if let Some(tut) = value.tut {
            prescription = prescription.with_tut(&tut);
        }
        if let Some(note) = value.note {
            prescription = prescription.with_note(&note);
        }
        Ok(prescription)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WorkoutExercise {
    pub id: Uuid,
    pub day_id: Uuid,
    pub exercise_id: Uuid,
    pub order: u32,
    #[serde(flatten)]
    pub prescription: Prescription,
    pub superset: Option<Uuid>,
}

impl From<domain::WorkoutExercise> for WorkoutExercise {
    fn from(value: domain::WorkoutExercise) -> Self {
        Self {
            id: *value.id,
            day_id: *value.day_id,
            exercise_id: *value.exercise_id,
            order: value.order,
            prescription: value.prescription.into(),
            superset: value.superset.map(|s| *s),
        }
    }
}

impl TryFrom<WorkoutExercise> for domain::WorkoutExercise {
    type Error = InvalidData;

    fn try_from(value: WorkoutExercise) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            day_id: value.day_id.into(),
            exercise_id: value.exercise_id.into(),
            order: value.order,
            prescription: value.prescription.try_into()?,
            superset: value.superset.map(domain::WorkoutExerciseID::from),
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: Uuid,
    pub order: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub id: Uuid,
    pub title: String,
    pub muscle_group: String,
    pub description: String,
    pub video: Option<Uuid>,
    pub duration: Option<u32>,
}

impl From<domain::Exercise> for Exercise {
    fn from(value: domain::Exercise) -> Self {
        Self {
            id: *value.id,
            title: value.title.to_string(),
            muscle_group: value.muscle_group.to_string(),
            description: value.description,
            video: value.video.map(|v| *v),
            duration: value.duration.map(u32::from),
        }
    }
}

impl TryFrom<Exercise> for domain::Exercise {
    type Error = InvalidData;

    fn try_from(value: Exercise) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            title: domain::Name::new(&value.title).map_err(invalid("title"))?,
            muscle_group: value
                .muscle_group
                .parse::<domain::MuscleGroup>()
                .map_err(invalid("muscle group"))?,
            description: value.description,
            video: value.video.map(domain::AssetID::from),
            duration: value
                .duration
                .map(domain::Time::new)
                .transpose()
                .map_err(invalid("duration"))?,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub active_subscriptions: Vec<String>,
}

impl From<domain::User> for User {
    fn from(value: domain::User) -> Self {
        Self {
            id: *value.id,
            name: value.name,
            email: value.email,
            active_subscriptions: value.active_subscriptions,
        }
    }
}

impl From<User> for domain::User {
    fn from(value: User) -> Self {
        Self {
            id: value.id.into(),
            name: value.name,
            email: value.email,
            active_subscriptions: value.active_subscriptions,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub id: Uuid,
    pub program_id: Uuid,
    pub user_id: Uuid,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<domain::Assignment> for Assignment {
    fn from(value: domain::Assignment) -> Self {
        Self {
            id: *value.id,
            program_id: *value.program_id,
            user_id: *value.user_id,
            completed: value.completed,
            completed_at: value.completed_at,
            expires_at: value.expires_at,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<Assignment> for domain::Assignment {
    fn from(value: Assignment) -> Self {
        Self {
            id: value.id.into(),
            program_id: value.program_id.into(),
            user_id: value.user_id.into(),
            completed: value.completed,
            completed_at: value.completed_at,
            expires_at: value.expires_at,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub total_pages: u32,
}

impl<T, D> From<domain::Page<D>> for Page<T>
where
    T: From<D>,
{
    fn from(value: domain::Page<D>) -> Self {
        Self {
            items: value.items.into_iter().map(Into::into).collect(),
            page: value.page,
            total_pages: value.total_pages,
        }
    }
}

impl<T: TryInto<D>, D> TryFrom<Page<T>> for domain::Page<D>
where
    InvalidData: From<T::Error>,
{
    type Error = InvalidData;

    fn try_from(value: Page<T>) -> Result<Self, Self::Error> {
        Ok(Self {
            items: try_collect(value.items)?,
            page: value.page,
            total_pages: value.total_pages,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub id: Uuid,
}
