#[cfg(test)]
#[path = "studio_test.rs"]
mod tests;

use tokio::sync::mpsc;

use super::ChatSession;
use super::IdentityOrchestrator;
use crate::domain::models::BackendBox;
use crate::domain::models::BrandError;
use crate::domain::models::BrandIdentity;
use crate::domain::models::Event;
use crate::domain::models::LogoSlot;

/// Holds what the user currently sees: one identity and one chat session.
pub struct Studio {
    orchestrator: IdentityOrchestrator,
    chat: ChatSession,
    identity: Option<BrandIdentity>,
}

impl Studio {
    pub fn new(backend: BackendBox) -> Studio {
        return Studio {
            orchestrator: IdentityOrchestrator::new(backend.clone()),
            chat: ChatSession::new(backend),
            identity: None,
        };
    }

    pub fn identity(&self) -> Option<&BrandIdentity> {
        return self.identity.as_ref();
    }

    pub fn chat(&self) -> &ChatSession {
        return &self.chat;
    }

    /// Replaces the displayed identity with a freshly generated one. On
    /// failure the previous identity stays in place.
    pub async fn new_identity(
        &mut self,
        mission: &str,
        tx: &mpsc::UnboundedSender<Event>,
    ) -> Result<&BrandIdentity, BrandError> {
        let identity = self
            .orchestrator
            .generate(mission, &mut self.chat, tx)
            .await?;
        tracing::debug!(
            stage = ?self.orchestrator.stage(),
            complete = identity.is_complete(),
            "Identity replaced"
        );

        return Ok(&*self.identity.insert(identity));
    }

    /// Renders the given slots again. Slots run concurrently and each result
    /// only ever touches its own slot.
    pub async fn regenerate(
        &mut self,
        slots: &[LogoSlot],
    ) -> Vec<(LogoSlot, Result<(), BrandError>)> {
        let strategy = match self
            .identity
            .as_ref()
            .and_then(|identity| return identity.strategy.clone())
        {
            Some(strategy) => strategy,
            None => {
                return slots
                    .iter()
                    .map(|slot| {
                        return (
                            *slot,
                            Err(BrandError::Validation(
                                "Generate an identity before regenerating logos.".to_string(),
                            )),
                        );
                    })
                    .collect();
            }
        };

        let orchestrator = &self.orchestrator;
        let (primary, secondary) = tokio::join!(
            async {
                if !slots.contains(&LogoSlot::Primary) {
                    return None;
                }
                return Some(
                    orchestrator
                        .regenerate_image(&strategy, LogoSlot::Primary)
                        .await,
                );
            },
            async {
                if !slots.contains(&LogoSlot::Secondary) {
                    return None;
                }
                return Some(
                    orchestrator
                        .regenerate_image(&strategy, LogoSlot::Secondary)
                        .await,
                );
            }
        );

        let mut results = vec![];
        for (slot, res) in [(LogoSlot::Primary, primary), (LogoSlot::Secondary, secondary)] {
            let res = match res {
                Some(res) => res,
                None => continue,
            };

            match res {
                Ok(url) => {
                    if let Some(identity) = self.identity.as_mut() {
                        identity.replace_logo(slot, url);
                    }
                    results.push((slot, Ok(())));
                }
                Err(err) => {
                    tracing::error!(slot = %slot, error = %err, "Regeneration failed");
                    results.push((slot, Err(err)));
                }
            }
        }

        return results;
    }

    /// Sends a chat message, never failing: errors come back as an apology.
    pub async fn send_chat(&mut self, text: &str) -> String {
        return self.chat.reply(text).await;
    }
}
