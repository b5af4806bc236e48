#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;

use tokio::sync::mpsc;

use super::ChatSession;
use super::ImageGenerator;
use super::StrategyGenerator;
use crate::domain::models::BackendBox;
use crate::domain::models::BrandError;
use crate::domain::models::BrandIdentity;
use crate::domain::models::BrandStrategy;
use crate::domain::models::Event;
use crate::domain::models::GenerationStage;
use crate::domain::models::LogoSlot;
use crate::domain::models::Mission;

/// Turns a mission into a full identity: strategy first, then both logos,
/// one call at a time.
pub struct IdentityOrchestrator {
    strategies: StrategyGenerator,
    images: ImageGenerator,
    stage: GenerationStage,
}

impl IdentityOrchestrator {
    pub fn new(backend: BackendBox) -> IdentityOrchestrator {
        return IdentityOrchestrator {
            strategies: StrategyGenerator::new(backend.clone()),
            images: ImageGenerator::new(backend),
            stage: GenerationStage::Idle,
        };
    }

    pub fn stage(&self) -> GenerationStage {
        return self.stage;
    }

    fn transition(&mut self, stage: GenerationStage, tx: &mpsc::UnboundedSender<Event>) {
        tracing::debug!(from = ?self.stage, to = ?stage, "Generation stage changed");
        self.stage = stage;
        if tx.send(Event::Progress(stage)).is_err() {
            tracing::debug!("Progress receiver dropped");
        }
    }

    /// Runs the whole pipeline. Any failure aborts the run and no identity is
    /// returned. The chat session is reseeded as soon as a strategy exists.
    pub async fn generate(
        &mut self,
        mission: &str,
        chat: &mut ChatSession,
        tx: &mpsc::UnboundedSender<Event>,
    ) -> Result<BrandIdentity, BrandError> {
        let mission = Mission::parse(mission)?;

        let res = self.run(mission, chat, tx).await;
        match &res {
            Ok(_) => self.transition(GenerationStage::Done, tx),
            Err(err) => {
                tracing::error!(error = %err, artifact = ?err.artifact(), "Identity generation failed");
                self.transition(GenerationStage::Failed, tx);
            }
        }

        return res;
    }

    async fn run(
        &mut self,
        mission: Mission,
        chat: &mut ChatSession,
        tx: &mpsc::UnboundedSender<Event>,
    ) -> Result<BrandIdentity, BrandError> {
        let mut identity = BrandIdentity::new(mission);

        self.transition(GenerationStage::Strategizing, tx);
        let strategy = self.strategies.generate(&identity.mission).await?;
        chat.init(Some(&strategy));

        self.transition(GenerationStage::RenderingPrimary, tx);
        let primary = self
            .images
            .generate(LogoSlot::Primary, &strategy.logo_prompts.primary)
            .await?;
        identity.replace_logo(LogoSlot::Primary, primary);

        self.transition(GenerationStage::RenderingSecondary, tx);
        let secondary = self
            .images
            .generate(LogoSlot::Secondary, &strategy.logo_prompts.secondary)
            .await?;
        identity.replace_logo(LogoSlot::Secondary, secondary);

        identity.strategy = Some(strategy);

        return Ok(identity);
    }

    /// Renders one slot again from the strategy's own prompt. Takes `&self`
    /// so both slots can be in flight at once.
    pub async fn regenerate_image(
        &self,
        strategy: &BrandStrategy,
        slot: LogoSlot,
    ) -> Result<String, BrandError> {
        tracing::debug!(slot = %slot, "Regenerating image");
        return self
            .images
            .generate(slot, strategy.logo_prompts.get(slot))
            .await;
    }
}
