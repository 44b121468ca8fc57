//! SVG-style path geometry (`M`, `L`, `Q`, `C`, `Z`).

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use crate::core::types::PixelPoint;
use crate::error::{ChartError, ChartResult};

/// Path command kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathVerb {
    Move,
    Line,
    Quad,
    Cubic,
    Close,
}

impl PathVerb {
    /// Number of points the verb carries; the last one is the anchor.
    #[must_use]
    pub const fn point_count(self) -> usize {
        match self {
            Self::Move | Self::Line => 1,
            Self::Quad => 2,
            Self::Cubic => 3,
            Self::Close => 0,
        }
    }

    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::Move => 'M',
            Self::Line => 'L',
            Self::Quad => 'Q',
            Self::Cubic => 'C',
            Self::Close => 'Z',
        }
    }

    fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'M' => Some(Self::Move),
            'L' => Some(Self::Line),
            'Q' => Some(Self::Quad),
            'C' => Some(Self::Cubic),
            'Z' | 'z' => Some(Self::Close),
            _ => None,
        }
    }
}

/// One command with its control/anchor points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathCommand {
    pub verb: PathVerb,
    pub points: SmallVec<[PixelPoint; 3]>,
}

impl PathCommand {
    #[must_use]
    pub fn move_to(point: PixelPoint) -> Self {
        Self {
            verb: PathVerb::Move,
            points: smallvec![point],
        }
    }

    #[must_use]
    pub fn line_to(point: PixelPoint) -> Self {
        Self {
            verb: PathVerb::Line,
            points: smallvec![point],
        }
    }

    #[must_use]
    pub fn close() -> Self {
        Self {
            verb: PathVerb::Close,
            points: SmallVec::new(),
        }
    }

    /// End point of the command; `None` for `Z`.
    #[must_use]
    pub fn anchor(&self) -> Option<PixelPoint> {
        self.points.last().copied()
    }

    /// Re-expresses the command with `verb`, padding missing control points
    /// with the anchor or dropping leading ones.
    #[must_use]
    pub fn reshaped(&self, verb: PathVerb) -> Self {
        let wanted = verb.point_count();
        let Some(anchor) = self.anchor() else {
            return Self {
                verb,
                points: SmallVec::new(),
            };
        };
        let mut points: SmallVec<[PixelPoint; 3]> = SmallVec::new();
        let available = self.points.len();
        for slot in 0..wanted {
            // Align from the end so the anchor always stays last.
            let source = (available + slot).checked_sub(wanted);
            points.push(source.map_or(anchor, |index| self.points[index]));
        }
        Self { verb, points }
    }
}

/// An ordered list of path commands.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PathGeometry {
    pub commands: Vec<PathCommand>,
}

impl PathGeometry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_commands(commands: Vec<PathCommand>) -> Self {
        Self { commands }
    }

    pub fn move_to(&mut self, point: PixelPoint) -> &mut Self {
        self.commands.push(PathCommand::move_to(point));
        self
    }

    pub fn line_to(&mut self, point: PixelPoint) -> &mut Self {
        self.commands.push(PathCommand::line_to(point));
        self
    }

    pub fn quad_to(&mut self, control: PixelPoint, point: PixelPoint) -> &mut Self {
        self.commands.push(PathCommand {
            verb: PathVerb::Quad,
            points: smallvec![control, point],
        });
        self
    }

    pub fn cubic_to(&mut self, first: PixelPoint, second: PixelPoint, point: PixelPoint) -> &mut Self {
        self.commands.push(PathCommand {
            verb: PathVerb::Cubic,
            points: smallvec![first, second, point],
        });
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.commands.push(PathCommand::close());
        self
    }

    /// Appends all commands of `other`.
    pub fn extend(&mut self, other: PathGeometry) -> &mut Self {
        self.commands.extend(other.commands);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// True when the last command is `Z`.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self.commands.last(), Some(command) if command.verb == PathVerb::Close)
    }

    /// Number of `M` commands.
    #[must_use]
    pub fn subpath_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|command| command.verb == PathVerb::Move)
            .count()
    }

    /// Anchor points of all drawing commands, in order.
    pub fn vertices(&self) -> impl Iterator<Item = PixelPoint> + '_ {
        self.commands.iter().filter_map(PathCommand::anchor)
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.commands
            .iter()
            .flat_map(|command| command.points.iter())
            .all(|point| point.x.is_finite() && point.y.is_finite())
    }

    /// Serializes to an SVG path string such as `M 0 0 L 10 5 Z`.
    #[must_use]
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        for command in &self.commands {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push(command.verb.letter());
            for point in &command.points {
                let _ = write!(out, " {} {}", format_coordinate(point.x), format_coordinate(point.y));
            }
        }
        out
    }

    /// Parses absolute `M`/`L`/`Q`/`C`/`Z` path data.
    ///
    /// Commas and whitespace both separate numbers; coordinates following a
    /// command's points repeat it (`M` repeats as `L`).
    pub fn parse(input: &str) -> ChartResult<Self> {
        let tokens = tokenize(input)?;
        let mut commands = Vec::new();
        let mut cursor = 0;
        let mut current: Option<PathVerb> = None;
        while cursor < tokens.len() {
            let (position, token) = &tokens[cursor];
            let verb = match token {
                Token::Verb(verb) => {
                    cursor += 1;
                    *verb
                }
                Token::Number(_) => match current {
                    Some(PathVerb::Move) => PathVerb::Line,
                    Some(PathVerb::Close) | None => {
                        return Err(ChartError::PathParse {
                            position: *position,
                            message: "coordinate without a command".to_owned(),
                        });
                    }
                    Some(verb) => verb,
                },
            };
            let mut points: SmallVec<[PixelPoint; 3]> = SmallVec::new();
            for _ in 0..verb.point_count() {
                let x = number_at(&tokens, cursor, input.len())?;
                let y = number_at(&tokens, cursor + 1, input.len())?;
                points.push(PixelPoint::new(x, y));
                cursor += 2;
            }
            commands.push(PathCommand { verb, points });
            current = Some(verb);
        }
        Ok(Self { commands })
    }
}

/// Formats a coordinate with at most four decimals and no negative zero.
#[must_use]
pub fn format_coordinate(value: f64) -> String {
    let rounded = (value * 10_000.0).round() / 10_000.0;
    if rounded == 0.0 {
        "0".to_owned()
    } else {
        format!("{rounded}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Verb(PathVerb),
    Number(f64),
}

fn number_at(tokens: &[(usize, Token)], index: usize, end: usize) -> ChartResult<f64> {
    match tokens.get(index) {
        Some((_, Token::Number(value))) => Ok(*value),
        Some((position, Token::Verb(verb))) => Err(ChartError::PathParse {
            position: *position,
            message: format!("expected coordinate, found `{}`", verb.letter()),
        }),
        None => Err(ChartError::PathParse {
            position: end,
            message: "unexpected end of path".to_owned(),
        }),
    }
}

fn tokenize(input: &str) -> ChartResult<Vec<(usize, Token)>> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut index = 0;
    while index < bytes.len() {
        let byte = bytes[index];
        if byte.is_ascii_whitespace() || byte == b',' {
            index += 1;
            continue;
        }
        if byte.is_ascii_alphabetic() && byte != b'e' && byte != b'E' {
            let verb = PathVerb::from_letter(char::from(byte)).ok_or_else(|| ChartError::PathParse {
                position: index,
                message: format!("unsupported command `{}`", char::from(byte)),
            })?;
            tokens.push((index, Token::Verb(verb)));
            index += 1;
            continue;
        }

        let start = index;
        if byte == b'-' || byte == b'+' {
            index += 1;
        }
        let mut seen_dot = false;
        let mut seen_exponent = false;
        while index < bytes.len() {
            let current = bytes[index];
            if current.is_ascii_digit() {
                index += 1;
            } else if current == b'.' && !seen_dot && !seen_exponent {
                seen_dot = true;
                index += 1;
            } else if (current == b'e' || current == b'E') && !seen_exponent && index > start {
                seen_exponent = true;
                index += 1;
                if index < bytes.len() && (bytes[index] == b'-' || bytes[index] == b'+') {
                    index += 1;
                }
            } else {
                break;
            }
        }
        let text = &input[start..index];
        let value = text.parse::<f64>().map_err(|_| ChartError::PathParse {
            position: start,
            message: format!("invalid number `{text}`"),
        })?;
        if !value.is_finite() {
            return Err(ChartError::PathParse {
                position: start,
                message: format!("non-finite number `{text}`"),
            });
        }
        tokens.push((start, Token::Number(value)));
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::{format_coordinate, PathCommand, PathGeometry, PathVerb};
    use crate::core::types::PixelPoint;

    #[test]
    fn implicit_line_after_move() {
        let path = PathGeometry::parse("M0,0 10,5 L 20 5").expect("parse");
        let verbs: Vec<PathVerb> = path.commands.iter().map(|command| command.verb).collect();
        assert_eq!(verbs, vec![PathVerb::Move, PathVerb::Line, PathVerb::Line]);
    }

    #[test]
    fn parse_reports_byte_position() {
        let err = PathGeometry::parse("M 0 0 X 1 1").expect_err("unsupported");
        assert!(err.to_string().contains("byte 6"));
    }

    #[test]
    fn truncated_command_is_an_error() {
        assert!(PathGeometry::parse("M 0 0 C 1 1 2").is_err());
    }

    #[test]
    fn coordinates_drop_float_noise() {
        assert_eq!(format_coordinate(0.1 + 0.2), "0.3");
        assert_eq!(format_coordinate(-0.00001), "0");
    }

    #[test]
    fn reshape_keeps_anchor_last() {
        let line = PathCommand::line_to(PixelPoint::new(3.0, 4.0));
        let cubic = line.reshaped(PathVerb::Cubic);
        assert_eq!(cubic.points.len(), 3);
        assert!(cubic.points.iter().all(|point| *point == PixelPoint::new(3.0, 4.0)));

        let mut path = PathGeometry::new();
        path.cubic_to(
            PixelPoint::new(1.0, 1.0),
            PixelPoint::new(2.0, 2.0),
            PixelPoint::new(3.0, 3.0),
        );
        let back = path.commands[0].reshaped(PathVerb::Line);
        assert_eq!(back.points.as_slice(), &[PixelPoint::new(3.0, 3.0)]);
    }
}
