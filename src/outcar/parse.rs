use crate::error::Error;
use crate::outcar::record::{Configuration, Spin, StateRecord};
use crate::trace::{LogObserver, Observer, TraceEvent};
use crate::Result;
use regex::Regex;

/// Column header introducing the table of a non-spin-polarized run.
pub const UNPOLARIZED_HEADER: &str = "  band No.  band energies     occupation ";
/// Separator closing the non-spin-polarized table.
pub const UNPOLARIZED_END: &str = "-------";
/// Start of the first spin channel.
pub const SPIN_UP_ANCHOR: &str = "spin component 1";
/// Start of the second spin channel; also closes the first one.
pub const SPIN_DOWN_ANCHOR: &str = "spin component 2";
/// Separator closing the second spin channel.
pub const POLARIZED_END: &str = "-----";

// A row is exactly three whitespace-separated numbers:
// 1) band index
// 2) band energy
// 3) occupation
const ROW_RE: &str = r"^\s*(-?\d+\.?\d*)\s+(-?\d+\.?\d*)\s+(-?\d+\.?\d*)\s*$";

/// Extracts state tables from OUTCAR-formatted text.
pub struct Parser<'o> {
    row: Regex,
    observer: &'o dyn Observer,
}

impl<'o> Parser<'o> {
    pub fn new(observer: &'o dyn Observer) -> Result<Self> {
        Ok(Self {
            row: Regex::new(ROW_RE)?,
            observer,
        })
    }

    /// Parse the last electronic configuration printed in `text`.
    pub fn parse(&self, text: &str, polarized: bool) -> Result<Configuration> {
        if polarized {
            let up = self.parse_section(text, Spin::Up, SPIN_UP_ANCHOR, SPIN_DOWN_ANCHOR)?;
            let down = self.parse_section(text, Spin::Down, SPIN_DOWN_ANCHOR, POLARIZED_END)?;
            Ok(Configuration::Polarized { up, down })
        } else {
            let states =
                self.parse_section(text, Spin::None, UNPOLARIZED_HEADER, UNPOLARIZED_END)?;
            Ok(Configuration::Unpolarized(states))
        }
    }

    fn parse_section(
        &self,
        text: &str,
        spin: Spin,
        anchor: &'static str,
        end: &'static str,
    ) -> Result<Vec<StateRecord>> {
        let (first_line, region) = section(text, section_name(spin), anchor, end)?;
        self.observer.event(&TraceEvent::SectionFound { spin, anchor });

        let states = self.scan(region, first_line, spin)?;
        self.observer.event(&TraceEvent::ChannelParsed {
            spin,
            states: states.len(),
        });
        Ok(states)
    }

    /// Read rows until the first non-conforming line after the table started.
    fn scan(&self, region: &str, first_line: usize, spin: Spin) -> Result<Vec<StateRecord>> {
        let mut out = Vec::new();
        for (offset, line) in region.lines().enumerate() {
            let lno = first_line + offset;

            // The k-point header carries three coordinates and looks like a row.
            if line.contains("k-point") {
                self.observer
                    .event(&TraceEvent::KPointSkipped { spin, line: lno });
                continue;
            }

            let Some(caps) = self.row.captures(line) else {
                if out.is_empty() {
                    continue;
                }
                break;
            };
            let (_, [band, energy, occupation]) = caps.extract();

            out.push(StateRecord {
                band_index: convert(band, lno, "band index")?,
                energy: convert(energy, lno, "energy")?,
                occupation: convert(occupation, lno, "occupation")?,
                spin,
            });
        }
        Ok(out)
    }
}

/// Parse with the default `log`-backed observer.
pub fn parse(text: &str, polarized: bool) -> Result<Configuration> {
    Parser::new(&LogObserver)?.parse(text, polarized)
}

fn section_name(spin: Spin) -> &'static str {
    match spin {
        Spin::None => "band energies",
        Spin::Up => "spin component 1",
        Spin::Down => "spin component 2",
    }
}

/// Locate the region between the last `anchor` and the following `end`.
///
/// Returns the 1-based line number the region starts on together with the
/// region itself (which begins with the remainder of the anchor line).
fn section<'t>(
    text: &'t str,
    name: &'static str,
    anchor: &'static str,
    end: &'static str,
) -> Result<(usize, &'t str)> {
    let start = text
        .rfind(anchor)
        .map(|pos| pos + anchor.len())
        .ok_or(Error::MissingSection {
            section: name,
            anchor,
        })?;
    let rest = &text[start..];
    let len = rest.find(end).ok_or(Error::MissingSection {
        section: name,
        anchor: end,
    })?;
    let first_line = text[..start].matches('\n').count() + 1;
    Ok((first_line, &rest[..len]))
}

fn convert<T: std::str::FromStr>(token: &str, line: usize, kind: &'static str) -> Result<T> {
    token.parse().map_err(|_| Error::Conversion {
        line,
        token: token.to_string(),
        kind,
    })
}
