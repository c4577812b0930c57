/// Create and edit flows share one screen; the mode decides which endpoint
/// the submission targets and what the screen is titled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(i64),
}

impl FormMode {
    pub fn is_edit(&self) -> bool {
        matches!(self, FormMode::Edit(_))
    }
}

/// Why a submission was refused. The screen surfaces `MissingFields` to the
/// operator; `InFlight` is silent because the first submission is still
/// running.
#[derive(Debug, PartialEq, Eq)]
pub enum SubmitBlocked {
    MissingFields(Vec<String>),
    InFlight,
}

/// Submission gating for form screens: no submit with required fields
/// missing, and no second submit while one is outstanding. Field values
/// live in the owning screen and survive a failed submission untouched.
#[derive(Debug)]
pub struct FormController {
    mode: FormMode,
    in_flight: bool,
}

impl FormController {
    pub fn new(mode: FormMode) -> Self {
        Self { mode, in_flight: false }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Gates a submission attempt. `missing` lists required fields the
    /// screen found empty; any entry blocks the attempt.
    pub fn begin_submit(&mut self, missing: Vec<String>) -> Result<(), SubmitBlocked> {
        if self.in_flight {
            return Err(SubmitBlocked::InFlight);
        }
        if !missing.is_empty() {
            return Err(SubmitBlocked::MissingFields(missing));
        }
        self.in_flight = true;
        Ok(())
    }

    /// Re-enables the form once the gateway answered, success or failure.
    pub fn finish_submit(&mut self) {
        self.in_flight = false;
    }
}
