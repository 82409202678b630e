use anyhow::Result;

/// Confirmation gate between listing and processing. Every run starts
/// `Listed`; the bypass flag confirms directly, otherwise the prompt
/// decides. `Aborted` means nothing is executed and the run exits cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Listed,
    Confirmed,
    Aborted,
}

impl Gate {
    pub fn resolve<F>(self, bypass: bool, prompt: F) -> Result<Gate>
    where
        F: FnOnce() -> Result<bool>,
    {
        match self {
            Gate::Listed => {
                if bypass {
                    return Ok(Gate::Confirmed);
                }
                Ok(if prompt()? { Gate::Confirmed } else { Gate::Aborted })
            }
            // Already resolved
            other => Ok(other),
        }
    }
}
