/// Steps of a single identity generation run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GenerationStage {
    Idle,
    Strategizing,
    RenderingPrimary,
    RenderingSecondary,
    Done,
    Failed,
}

impl GenerationStage {
    /// Human readable status shown while a remote call is in flight.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            GenerationStage::Strategizing => return Some("Drafting Brand Strategy..."),
            GenerationStage::RenderingPrimary => return Some("Rendering Primary Logo..."),
            GenerationStage::RenderingSecondary => return Some("Rendering Secondary Mark..."),
            GenerationStage::Idle | GenerationStage::Done | GenerationStage::Failed => {
                return None;
            }
        }
    }
}

pub enum Event {
    Progress(GenerationStage),
}
