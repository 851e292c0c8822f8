use crate::core::narrator::FortuneNarrator;
use crate::core::zodiac::zodiac_sign;
use crate::domain::model::{
    BirthInput, BirthSubmission, Coordinates, PlaceResolution, ReportSection, SessionReport,
    FALLBACK_COORDINATES,
};
use crate::domain::ports::{ChatCompleter, PlaceResolver, ReportSink};
use crate::ephemeris::EphemerisReader;
use crate::utils::error::Result;
use chrono::Datelike;

/// 表單送出後依序經過的階段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStage {
    Idle,
    Validating,
    ResolvingPlace,
    ComputingBirthPositions,
    ComputingFallbackPositions,
    ComputingCurrentPositions,
    Narrating,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FallbackPlace {
    pub name: String,
    pub coordinates: Coordinates,
}

impl Default for FallbackPlace {
    fn default() -> Self {
        Self {
            name: "Seoul".to_string(),
            coordinates: FALLBACK_COORDINATES,
        }
    }
}

/// Keeps every section in memory; used by tests and non-terminal callers.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub sections: Vec<ReportSection>,
}

impl ReportSink for CollectingSink {
    fn emit(&mut self, section: &ReportSection) -> Result<()> {
        self.sections.push(section.clone());
        Ok(())
    }
}

pub struct FortuneSession<P: PlaceResolver, C: ChatCompleter> {
    resolver: P,
    ephemeris: EphemerisReader,
    narrator: FortuneNarrator<C>,
    fallback: FallbackPlace,
}

impl<P: PlaceResolver, C: ChatCompleter> FortuneSession<P, C> {
    pub fn new(resolver: P, ephemeris: EphemerisReader, narrator: FortuneNarrator<C>) -> Self {
        Self {
            resolver,
            ephemeris,
            narrator,
            fallback: FallbackPlace::default(),
        }
    }

    pub fn with_fallback(mut self, fallback: FallbackPlace) -> Self {
        self.fallback = fallback;
        self
    }

    fn enter(&self, stage: SessionStage) {
        tracing::debug!("Session stage: {:?}", stage);
    }

    /// Runs one submission end to end. Sections reach `sink` as soon as they
    /// are computed, so a late failure still leaves earlier output rendered.
    pub async fn submit<S: ReportSink>(
        &self,
        submission: &BirthSubmission,
        sink: &mut S,
    ) -> Result<SessionReport> {
        self.enter(SessionStage::Validating);
        let input = match BirthInput::try_from(submission) {
            Ok(input) => input,
            Err(e) => {
                tracing::warn!("❌ Rejected birth data: {}", e);
                self.enter(SessionStage::Idle);
                return Err(e);
            }
        };

        let zodiac = zodiac_sign(input.date.month(), input.date.day());
        tracing::info!("Zodiac sign: {}", zodiac);
        sink.emit(&ReportSection::Zodiac(zodiac))?;

        self.enter(SessionStage::ResolvingPlace);
        let place = match self.resolver.resolve(&input.place).await {
            Some(coordinates) => {
                tracing::info!(
                    "📍 '{}' resolved to ({:.4}, {:.4})",
                    input.place,
                    coordinates.latitude,
                    coordinates.longitude
                );
                PlaceResolution::Resolved(coordinates)
            }
            None => {
                tracing::warn!(
                    "⚠️ Could not resolve '{}', using {} instead",
                    input.place,
                    self.fallback.name
                );
                PlaceResolution::Fallback(self.fallback.coordinates)
            }
        };

        let report = match place {
            PlaceResolution::Resolved(coordinates) => {
                sink.emit(&ReportSection::Coordinates(coordinates))?;

                self.enter(SessionStage::ComputingBirthPositions);
                let birth_positions = self.ephemeris.positions_at(input.instant(), coordinates)?;
                sink.emit(&ReportSection::BirthPositions {
                    positions: birth_positions.clone(),
                    fallback: false,
                })?;

                self.enter(SessionStage::ComputingCurrentPositions);
                let current_positions = self.ephemeris.current_positions(coordinates)?;
                sink.emit(&ReportSection::CurrentPositions {
                    positions: current_positions.clone(),
                    fallback: false,
                })?;

                self.enter(SessionStage::Narrating);
                let current_fortune = self.narrator.narrate(&current_positions).await?;
                sink.emit(&ReportSection::CurrentFortune {
                    fortune: current_fortune.clone(),
                    fallback: false,
                })?;

                SessionReport {
                    zodiac,
                    place,
                    birth_positions,
                    current_positions,
                    birth_fortune: None,
                    current_fortune,
                }
            }
            PlaceResolution::Fallback(coordinates) => {
                sink.emit(&ReportSection::FallbackNotice {
                    name: self.fallback.name.clone(),
                    coordinates,
                })?;

                self.enter(SessionStage::ComputingFallbackPositions);
                let birth_positions = self.ephemeris.positions_at(input.instant(), coordinates)?;
                sink.emit(&ReportSection::BirthPositions {
                    positions: birth_positions.clone(),
                    fallback: true,
                })?;

                self.enter(SessionStage::Narrating);
                let birth_fortune = self.narrator.narrate(&birth_positions).await?;
                sink.emit(&ReportSection::BirthFortune {
                    fortune: birth_fortune.clone(),
                    fallback: true,
                })?;

                self.enter(SessionStage::ComputingCurrentPositions);
                let current_positions = self.ephemeris.current_positions(coordinates)?;
                sink.emit(&ReportSection::CurrentPositions {
                    positions: current_positions.clone(),
                    fallback: true,
                })?;

                self.enter(SessionStage::Narrating);
                let current_fortune = self.narrator.narrate(&current_positions).await?;
                sink.emit(&ReportSection::CurrentFortune {
                    fortune: current_fortune.clone(),
                    fallback: true,
                })?;

                SessionReport {
                    zodiac,
                    place,
                    birth_positions,
                    current_positions,
                    birth_fortune: Some(birth_fortune),
                    current_fortune,
                }
            }
        };

        sink.emit(&ReportSection::Disclaimer)?;
        self.enter(SessionStage::Idle);
        let observer = report.place.coordinates();
        tracing::info!(
            "✅ Session completed for ({:.4}, {:.4}), fallback: {}",
            observer.latitude,
            observer.longitude,
            report.place.is_fallback()
        );
        Ok(report)
    }
}
