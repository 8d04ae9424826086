//! Wizard engine: an ordered list of steps with a clamped cursor.

use serde::Serialize;

use crate::errors::AppError;

/// Which editor a step shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepBody {
    JobDescription,
    PersonalInfo,
    ProfessionalSummary,
    Education,
    Skills,
    Experience,
    Projects,
    Additional,
    Review,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepDescriptor {
    pub title: &'static str,
    pub description: &'static str,
    pub body: StepBody,
}

pub const REFERENCE_STEPS: &[StepDescriptor] = &[
    StepDescriptor {
        title: "Analyze Job Description",
        description: "Paste the job description to identify important keywords",
        body: StepBody::JobDescription,
    },
    StepDescriptor {
        title: "Personal Information",
        description: "Add your contact details and professional links",
        body: StepBody::PersonalInfo,
    },
    StepDescriptor {
        title: "Professional Summary",
        description: "Write a concise overview of your background and goals",
        body: StepBody::ProfessionalSummary,
    },
    StepDescriptor {
        title: "Education",
        description: "Detail your academic qualifications",
        body: StepBody::Education,
    },
    StepDescriptor {
        title: "Skills",
        description: "Highlight your abilities and competencies",
        body: StepBody::Skills,
    },
    StepDescriptor {
        title: "Experience",
        description: "Add work experience, internships, and volunteering",
        body: StepBody::Experience,
    },
    StepDescriptor {
        title: "Projects",
        description: "Showcase academic or personal projects",
        body: StepBody::Projects,
    },
    StepDescriptor {
        title: "Additional Information",
        description: "Add certifications, extracurriculars, and awards",
        body: StepBody::Additional,
    },
    StepDescriptor {
        title: "Review & Download",
        description: "Preview your CV and download a formatted copy",
        body: StepBody::Review,
    },
];

/// Cursor over a fixed, non-empty step sequence. Both ends clamp; there is no terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wizard {
    steps: &'static [StepDescriptor],
    current: usize,
}

impl Default for Wizard {
    fn default() -> Self {
        Self {
            steps: REFERENCE_STEPS,
            current: 0,
        }
    }
}

impl Wizard {
    #[cfg(test)]
    pub fn new(steps: &'static [StepDescriptor]) -> Result<Self, AppError> {
        if steps.is_empty() {
            return Err(AppError::Validation(
                "A wizard needs at least one step".to_string(),
            ));
        }
        Ok(Self { steps, current: 0 })
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_step(&self) -> &StepDescriptor {
        &self.steps[self.current]
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn can_go_back(&self) -> bool {
        self.current > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.current + 1 < self.steps.len()
    }

    /// Advances one step; no-op on the last step.
    pub fn next(&mut self) {
        if self.can_go_forward() {
            self.current += 1;
        }
    }

    /// Goes back one step; no-op on the first step.
    pub fn previous(&mut self) {
        if self.can_go_back() {
            self.current -= 1;
        }
    }

    /// Jumps to `index`, clamped to the last step.
    pub fn go_to(&mut self, index: usize) {
        self.current = index.min(self.steps.len() - 1);
    }

    /// `floor((current + 1) / N * 100)`, computed on every call.
    pub fn progress_percent(&self) -> u8 {
        ((self.current + 1) * 100 / self.steps.len()) as u8
    }

    pub fn view(&self) -> WizardView {
        WizardView {
            current_index: self.current,
            total_steps: self.len(),
            step: *self.current_step(),
            progress_percent: self.progress_percent(),
            can_go_back: self.can_go_back(),
            can_go_forward: self.can_go_forward(),
        }
    }
}

/// Serializable snapshot of the wizard for clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardView {
    pub current_index: usize,
    pub total_steps: usize,
    pub step: StepDescriptor,
    pub progress_percent: u8,
    pub can_go_back: bool,
    pub can_go_forward: bool,
}
