use crate::domain::model::{Coordinates, FortuneSet, Locale, PlanetPositionSet, ReportSection};
use crate::domain::ports::ReportSink;
use crate::utils::error::Result;
use std::io::Write;

/// Renders report sections as plain text lines.
pub struct TerminalSink<W: Write> {
    out: W,
    locale: Locale,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W, locale: Locale) -> Self {
        Self { out, locale }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn heading(&self, section: &ReportSection) -> Option<&'static str> {
        let ko = self.locale == Locale::Ko;
        let text = match section {
            ReportSection::BirthPositions { fallback: false, .. } if ko => "태어난 때의 행성 위치:",
            ReportSection::BirthPositions { fallback: false, .. } => "Planet positions at birth:",
            ReportSection::BirthPositions { fallback: true, .. } if ko => {
                "태어난 때의 행성 위치 (기본 위치 기반):"
            }
            ReportSection::BirthPositions { fallback: true, .. } => {
                "Planet positions at birth (based on the default location):"
            }
            ReportSection::CurrentPositions { fallback: false, .. } if ko => "현재 행성 위치:",
            ReportSection::CurrentPositions { fallback: false, .. } => "Current planet positions:",
            ReportSection::CurrentPositions { fallback: true, .. } if ko => {
                "현재 행성 위치 (기본 위치 기반):"
            }
            ReportSection::CurrentPositions { fallback: true, .. } => {
                "Current planet positions (based on the default location):"
            }
            ReportSection::BirthFortune { fallback: false, .. } if ko => "당신의 운세:",
            ReportSection::BirthFortune { fallback: false, .. } => "Your fortune:",
            ReportSection::BirthFortune { fallback: true, .. } if ko => "당신의 운세 (기본 위치 기반):",
            ReportSection::BirthFortune { fallback: true, .. } => {
                "Your fortune (based on the default location):"
            }
            ReportSection::CurrentFortune { fallback: false, .. } if ko => "현재 운세:",
            ReportSection::CurrentFortune { fallback: false, .. } => "Current fortune:",
            ReportSection::CurrentFortune { fallback: true, .. } if ko => "현재 운세 (기본 위치 기반):",
            ReportSection::CurrentFortune { fallback: true, .. } => {
                "Current fortune (based on the default location):"
            }
            _ => return None,
        };
        Some(text)
    }

    fn write_positions(&mut self, positions: &PlanetPositionSet) -> Result<()> {
        for (body, position) in positions.iter() {
            writeln!(self.out, "{}: {}", body.display_name(), position)?;
        }
        Ok(())
    }

    fn write_fortune(&mut self, fortune: &FortuneSet) -> Result<()> {
        for (category, text) in fortune.iter() {
            writeln!(self.out, "[{}]", category.label(self.locale))?;
            writeln!(self.out, "{}", text)?;
        }
        Ok(())
    }

    fn write_coordinates(&mut self, coordinates: &Coordinates) -> Result<()> {
        match self.locale {
            Locale::Ko => writeln!(
                self.out,
                "태어난 장소의 좌표: 위도 {:.4}, 경도 {:.4}",
                coordinates.latitude, coordinates.longitude
            )?,
            Locale::En => writeln!(
                self.out,
                "Birth place coordinates: latitude {:.4}, longitude {:.4}",
                coordinates.latitude, coordinates.longitude
            )?,
        }
        Ok(())
    }
}

impl<W: Write> ReportSink for TerminalSink<W> {
    fn emit(&mut self, section: &ReportSection) -> Result<()> {
        if let Some(heading) = self.heading(section) {
            writeln!(self.out)?;
            writeln!(self.out, "{}", heading)?;
        }

        match (section, self.locale) {
            (ReportSection::Zodiac(sign), Locale::Ko) => {
                writeln!(self.out, "당신의 별자리는: {}", sign.name(Locale::Ko))?
            }
            (ReportSection::Zodiac(sign), Locale::En) => {
                writeln!(self.out, "Your zodiac sign is: {}", sign.name(Locale::En))?
            }
            (ReportSection::Coordinates(coordinates), _) => self.write_coordinates(coordinates)?,
            (ReportSection::FallbackNotice { name, .. }, Locale::Ko) => writeln!(
                self.out,
                "입력한 태어난 장소의 좌표를 찾을 수 없습니다. 기본 위치({})를 사용합니다.",
                name
            )?,
            (ReportSection::FallbackNotice { name, .. }, Locale::En) => writeln!(
                self.out,
                "Could not find the coordinates of the birth place. Using the default location ({}).",
                name
            )?,
            (ReportSection::BirthPositions { positions, .. }, _)
            | (ReportSection::CurrentPositions { positions, .. }, _) => {
                self.write_positions(positions)?
            }
            (ReportSection::BirthFortune { fortune, .. }, _)
            | (ReportSection::CurrentFortune { fortune, .. }, _) => self.write_fortune(fortune)?,
            (ReportSection::Disclaimer, Locale::Ko) => {
                writeln!(self.out)?;
                writeln!(
                    self.out,
                    "참고: 이 앱은 오락 목적으로 점성술 정보를 제공합니다.\n\
                     점성술은 과학적인 학문으로 간주되지 않으며 중요한 결정을 내리는 데 사용되지 않아야 합니다."
                )?;
            }
            (ReportSection::Disclaimer, Locale::En) => {
                writeln!(self.out)?;
                writeln!(
                    self.out,
                    "Note: this app provides astrology information for entertainment purposes only.\n\
                     Astrology is not considered a science and should not be used to make important decisions."
                )?;
            }
        }

        self.out.flush()?;
        Ok(())
    }
}
