use chrono::{DateTime, Utc};
use semval::prelude::*;
use uuid::Uuid;

const TITLE_MAX_LENGTH: usize = 100;
const DESCRIPTION_MAX_LENGTH: usize = 500;
const CATEGORY_MAX_LENGTH: usize = 20;

/// A submitted project as it exists before the moderation gate has ruled on
/// it. Nothing is persisted at this point.
#[derive(Clone, Debug)]
pub struct ProjectDraft {
    creator_id: Uuid,
    title: String,
    description: String,
    category: String,
    target_amount: f64,
    end_date: DateTime<Utc>,
}

pub struct ProjectDraftData {
    pub creator_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub target_amount: f64,
    pub end_date: DateTime<Utc>,
}

impl ProjectDraft {
    pub fn creator_id(&self) -> Uuid {
        self.creator_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn target_amount(&self) -> f64 {
        self.target_amount
    }

    pub fn end_date(&self) -> DateTime<Utc> {
        self.end_date
    }
}

#[derive(Debug, Eq, PartialEq)]
pub enum ProjectDraftInvalidity {
    TitleEmpty,
    TitleTooLong,
    DescriptionEmpty,
    DescriptionTooLong,
    CategoryEmpty,
    CategoryTooLong,
    TargetAmountNotPositive,
}

impl Validate for ProjectDraft {
    type Invalidity = ProjectDraftInvalidity;

    fn validate(&self) -> ValidationResult<Self::Invalidity> {
        ValidationContext::new()
            .invalidate_if(
                self.title.trim().is_empty(),
                ProjectDraftInvalidity::TitleEmpty,
            )
            .invalidate_if(
                self.title.chars().count() > TITLE_MAX_LENGTH,
                ProjectDraftInvalidity::TitleTooLong,
            )
            .invalidate_if(
                self.description.trim().is_empty(),
                ProjectDraftInvalidity::DescriptionEmpty,
            )
            .invalidate_if(
                self.description.chars().count() > DESCRIPTION_MAX_LENGTH,
                ProjectDraftInvalidity::DescriptionTooLong,
            )
            .invalidate_if(
                self.category.trim().is_empty(),
                ProjectDraftInvalidity::CategoryEmpty,
            )
            .invalidate_if(
                self.category.chars().count() > CATEGORY_MAX_LENGTH,
                ProjectDraftInvalidity::CategoryTooLong,
            )
            .invalidate_if(
                self.target_amount <= 0.0,
                ProjectDraftInvalidity::TargetAmountNotPositive,
            )
            .into()
    }
}

impl ValidatedFrom<ProjectDraftData> for ProjectDraft {
    fn validated_from(from: ProjectDraftData) -> ValidatedResult<Self> {
        let into = Self {
            creator_id: from.creator_id,
            title: from.title,
            description: from.description,
            category: from.category,
            target_amount: from.target_amount,
            end_date: from.end_date,
        };

        match into.validate() {
            Ok(()) => Ok(into),
            Err(context) => Err((into, context)),
        }
    }
}
