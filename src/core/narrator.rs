use crate::domain::model::{Body, FortuneCategory, FortuneSet, PlanetPositionSet};
use crate::domain::ports::ChatCompleter;
use crate::utils::error::{FortuneError, Result};

pub const DEFAULT_LANGUAGE: &str = "Korean";

/// `{language}` is replaced with the configured response language.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful assistant that provides astrology fortune readings. Please answer in {language}.";

fn subject(category: FortuneCategory) -> &'static str {
    match category {
        FortuneCategory::Finance => "financial",
        FortuneCategory::Love => "love",
        FortuneCategory::Health => "health",
        FortuneCategory::Career => "career",
    }
}

fn body_phrase(body: Body, positions: &PlanetPositionSet) -> Result<String> {
    let position = positions.formatted(body).ok_or_else(|| {
        FortuneError::kernel(format!("position set has no entry for {}", body.key()))
    })?;
    let name = match body {
        Body::Moon => "the Moon".to_string(),
        other => other.display_name().to_string(),
    };
    Ok(format!("{} ({})", name, position))
}

/// One user prompt per category, in [`FortuneCategory::ALL`] order.
pub fn build_prompts(
    positions: &PlanetPositionSet,
    language: &str,
) -> Result<Vec<(FortuneCategory, String)>> {
    FortuneCategory::ALL
        .iter()
        .map(|&category| {
            let phrases = category
                .bodies()
                .iter()
                .map(|&body| body_phrase(body, positions))
                .collect::<Result<Vec<_>>>()?;

            let lead = match phrases.as_slice() {
                [single] => format!("Given the position of {}", single),
                many => format!("Given the positions of {}", many.join(" and ")),
            };

            Ok((
                category,
                format!(
                    "{}, evaluate the {} fortune, assign a score out of 100, and provide the result in {}.",
                    lead,
                    subject(category),
                    language
                ),
            ))
        })
        .collect()
}

pub struct FortuneNarrator<C: ChatCompleter> {
    client: C,
    language: String,
    system_prompt: String,
}

impl<C: ChatCompleter> FortuneNarrator<C> {
    pub fn new(client: C, language: impl Into<String>) -> Self {
        Self::with_system_prompt(client, language, DEFAULT_SYSTEM_PROMPT)
    }

    pub fn with_system_prompt(
        client: C,
        language: impl Into<String>,
        system_prompt: impl Into<String>,
    ) -> Self {
        let language = language.into();
        let system_prompt = system_prompt.into().replace("{language}", &language);
        Self {
            client,
            language,
            system_prompt,
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// 四個類別依序呼叫，任何一個失敗就整體失敗
    pub async fn narrate(&self, positions: &PlanetPositionSet) -> Result<FortuneSet> {
        let prompts = build_prompts(positions, &self.language)?;
        let mut entries = Vec::with_capacity(prompts.len());

        for (category, prompt) in prompts {
            tracing::debug!("Requesting {:?} fortune", category);
            let text = self.client.complete(&self.system_prompt, &prompt).await?;
            tracing::debug!("{:?} fortune: {} chars", category, text.chars().count());
            entries.push((category, text));
        }

        Ok(FortuneSet::new(entries))
    }
}
