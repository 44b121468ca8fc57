//! Morphing between two path snapshots of the same series.
//!
//! Paths with equal command counts blend pointwise. When the counts differ,
//! commands present only in the end path grow out of the last shared anchor
//! and commands present only in the start path collapse onto the end path's
//! last anchor. A single closed subpath on both sides is treated as an area:
//! its upper and lower edges blend separately so the baseline stays pinned.

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};
use tracing::debug;

use crate::core::types::PixelPoint;
use crate::error::{ChartError, ChartResult};
use crate::render::path::format_coordinate;
use crate::render::{PathCommand, PathGeometry, PathVerb};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterpolationTuning {
    /// Progress after which collapsing commands are dropped.
    pub completion_threshold: f64,
}

impl Default for InterpolationTuning {
    fn default() -> Self {
        Self {
            completion_threshold: 0.99,
        }
    }
}

impl InterpolationTuning {
    pub fn validate(self) -> ChartResult<Self> {
        if !self.completion_threshold.is_finite() || !(0.0..=1.0).contains(&self.completion_threshold) {
            return Err(ChartError::InvalidData(
                "completion threshold must be finite and in [0, 1]".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Interpolates two SVG path strings with the default tuning.
///
/// `removed_point_index` names the point that was added or removed between
/// the snapshots, when known. Never fails: unparsable input falls back to a
/// numeric-token blend of the raw strings.
#[must_use]
pub fn interpolate(start: &str, end: &str, progress: f64, removed_point_index: Option<usize>) -> String {
    interpolate_with(
        start,
        end,
        progress,
        removed_point_index,
        InterpolationTuning::default(),
    )
}

#[must_use]
pub fn interpolate_with(
    start: &str,
    end: &str,
    progress: f64,
    removed_point_index: Option<usize>,
    tuning: InterpolationTuning,
) -> String {
    let progress = sanitize_progress(progress);
    if progress <= 0.0 {
        return start.to_owned();
    }
    if progress >= 1.0 {
        return end.to_owned();
    }
    match (PathGeometry::parse(start), PathGeometry::parse(end)) {
        (Ok(start_path), Ok(end_path)) => {
            interpolate_geometry(&start_path, &end_path, progress, removed_point_index, tuning)
                .to_svg()
        }
        (Err(err), _) | (_, Err(err)) => {
            debug!(error = %err, progress, "path parse failed; blending numeric tokens");
            lerp_numeric_tokens(start, end, progress)
        }
    }
}

/// Typed form of [`interpolate_with`].
#[must_use]
pub fn interpolate_geometry(
    start: &PathGeometry,
    end: &PathGeometry,
    progress: f64,
    removed_point_index: Option<usize>,
    tuning: InterpolationTuning,
) -> PathGeometry {
    let progress = sanitize_progress(progress);
    if progress <= 0.0 {
        return start.clone();
    }
    if progress >= 1.0 {
        return end.clone();
    }
    if let Some(area) = interpolate_area(start, end, progress, removed_point_index, tuning) {
        return area;
    }
    PathGeometry::from_commands(blend_with_hint(
        &start.commands,
        &end.commands,
        progress,
        removed_point_index,
        tuning,
    ))
}

fn sanitize_progress(progress: f64) -> f64 {
    if progress.is_nan() { 0.0 } else { progress }
}

/// Open-path blend honouring the added/removed point hint.
fn blend_with_hint(
    start: &[PathCommand],
    end: &[PathCommand],
    t: f64,
    hint: Option<usize>,
    tuning: InterpolationTuning,
) -> Vec<PathCommand> {
    let end_is_longer = end.len() >= start.len();
    let Some(index) = hint.filter(|_| start.len() != end.len()) else {
        return blend(start, end, t, end_is_longer, tuning);
    };

    if end_is_longer {
        match splice_synthetic(start, end, index) {
            Some(spliced) => blend(&spliced, end, t, true, tuning),
            None => blend(start, end, t, true, tuning),
        }
    } else {
        let Some(spliced) = splice_synthetic(end, start, index) else {
            return blend(start, end, t, false, tuning);
        };
        let index = index.min(end.len());
        let mut out = blend(start, &spliced, t, false, tuning);
        if t > tuning.completion_threshold && index < out.len() {
            out.remove(index);
            if index == 0 {
                if let Some(first) = out.first_mut() {
                    *first = first.reshaped(PathVerb::Move);
                }
            }
        }
        out
    }
}

/// Inserts a collapsed command into `shorter` at `index`, positioned at the
/// midpoint of its neighbouring anchors (or the single neighbour at an edge)
/// and carrying the verb `longer` has at that index.
fn splice_synthetic(shorter: &[PathCommand], longer: &[PathCommand], index: usize) -> Option<Vec<PathCommand>> {
    let index = index.min(shorter.len());
    let previous = shorter[..index].iter().rev().find_map(PathCommand::anchor);
    let next = shorter[index..].iter().find_map(PathCommand::anchor);
    let anchor = match (previous, next) {
        (Some(previous), Some(next)) => previous.midpoint(next),
        (Some(point), None) | (None, Some(point)) => point,
        (None, None) => return None,
    };
    let verb = match longer.get(index).map(|command| command.verb) {
        Some(PathVerb::Close) | None => PathVerb::Line,
        Some(verb) => verb,
    };
    let mut spliced = shorter.to_vec();
    spliced.insert(index, collapsed(verb, anchor));
    Some(spliced)
}

/// Pairwise blend of the shared prefix plus growing/collapsing extras.
fn blend(
    start: &[PathCommand],
    end: &[PathCommand],
    t: f64,
    prefer_end_verbs: bool,
    tuning: InterpolationTuning,
) -> Vec<PathCommand> {
    let shared = start.len().min(end.len());
    let mut out = Vec::with_capacity(start.len().max(end.len()));
    for (from, to) in start.iter().zip(end.iter()) {
        let verb = if prefer_end_verbs { to.verb } else { from.verb };
        out.push(lerp_command(from, to, verb, t));
    }

    if end.len() > shared {
        let origin = start[..shared]
            .iter()
            .rev()
            .find_map(PathCommand::anchor)
            .or_else(|| end[..shared].iter().rev().find_map(PathCommand::anchor));
        for command in &end[shared..] {
            out.push(match origin {
                Some(origin) => lerp_command(&collapsed(command.verb, origin), command, command.verb, t),
                None => command.clone(),
            });
        }
    } else if start.len() > shared && t <= tuning.completion_threshold {
        let target = end.iter().rev().find_map(PathCommand::anchor);
        for command in &start[shared..] {
            out.push(match target {
                Some(target) => lerp_command(command, &collapsed(command.verb, target), command.verb, t),
                None => command.clone(),
            });
        }
    }
    out
}

fn collapsed(verb: PathVerb, point: PixelPoint) -> PathCommand {
    PathCommand {
        verb,
        points: smallvec![point; verb.point_count()],
    }
}

fn lerp_command(from: &PathCommand, to: &PathCommand, verb: PathVerb, t: f64) -> PathCommand {
    if verb == PathVerb::Close {
        return PathCommand::close();
    }
    if from.points.is_empty() || to.points.is_empty() {
        let source = if from.points.is_empty() { to } else { from };
        return source.reshaped(verb);
    }
    let from = from.reshaped(verb);
    let to = to.reshaped(verb);
    let points: SmallVec<[PixelPoint; 3]> = from
        .points
        .iter()
        .zip(to.points.iter())
        .map(|(a, b)| a.lerp(*b, t))
        .collect();
    PathCommand { verb, points }
}

/// A closed single-subpath area split into pinned baseline vertices and the
/// two data edges.
#[derive(Debug)]
struct AreaParts {
    lead: Option<PathCommand>,
    upper: Vec<PathCommand>,
    trailing: Option<PathCommand>,
    lower: Vec<PathCommand>,
}

fn split_area(path: &PathGeometry) -> Option<AreaParts> {
    if path.subpath_count() != 1 || !path.is_closed() {
        return None;
    }
    let body = &path.commands[..path.commands.len() - 1];
    if body.len() < 2
        || body[0].verb != PathVerb::Move
        || body.iter().any(|command| command.verb == PathVerb::Close)
    {
        return None;
    }
    let vertices: Vec<PixelPoint> = body.iter().filter_map(PathCommand::anchor).collect();
    let category_is_y = count_zero_steps(&vertices, |p| p.y) > count_zero_steps(&vertices, |p| p.x);
    let coordinate = |point: PixelPoint| if category_is_y { point.y } else { point.x };

    let turn = reversal_index(&vertices, coordinate);
    let mut upper = body[..=turn].to_vec();
    let lower = body[turn + 1..].to_vec();

    let lead = if upper.len() >= 2 && coordinate(vertices[0]) == coordinate(vertices[1]) {
        Some(upper.remove(0))
    } else {
        None
    };
    let trailing = if upper.len() >= 2 {
        let last = upper[upper.len() - 1].anchor();
        let before = upper[upper.len() - 2].anchor();
        match (last, before) {
            (Some(last), Some(before)) if coordinate(last) == coordinate(before) => upper.pop(),
            _ => None,
        }
    } else {
        None
    };
    Some(AreaParts {
        lead,
        upper,
        trailing,
        lower,
    })
}

fn count_zero_steps(vertices: &[PixelPoint], coordinate: impl Fn(PixelPoint) -> f64) -> usize {
    vertices
        .windows(2)
        .filter(|pair| coordinate(pair[1]) - coordinate(pair[0]) == 0.0)
        .count()
}

/// Last vertex of the upper edge: the first vertex whose next nonzero step
/// runs against the primary direction. Without a reversal every vertex is
/// upper.
fn reversal_index(vertices: &[PixelPoint], coordinate: impl Fn(PixelPoint) -> f64) -> usize {
    let steps: Vec<f64> = vertices
        .windows(2)
        .map(|pair| coordinate(pair[1]) - coordinate(pair[0]))
        .collect();
    let Some(primary) = steps.iter().copied().find(|step| *step != 0.0).map(f64::signum) else {
        return vertices.len() - 1;
    };
    for start in 0..steps.len() {
        let next = steps[start..].iter().copied().find(|step| *step != 0.0);
        if matches!(next, Some(step) if step.signum() != primary) {
            return start;
        }
    }
    vertices.len() - 1
}

fn interpolate_area(
    start: &PathGeometry,
    end: &PathGeometry,
    t: f64,
    hint: Option<usize>,
    tuning: InterpolationTuning,
) -> Option<PathGeometry> {
    let from = split_area(start)?;
    let to = split_area(end)?;
    if from.lead.is_some() != to.lead.is_some() || from.trailing.is_some() != to.trailing.is_some() {
        return None;
    }

    let upper = blend_with_hint(&from.upper, &to.upper, t, hint, tuning);
    let reversed = |commands: &[PathCommand]| commands.iter().rev().cloned().collect::<Vec<_>>();
    let mut lower = blend_with_hint(&reversed(&from.lower), &reversed(&to.lower), t, hint, tuning);
    lower.reverse();

    let mut commands = Vec::with_capacity(upper.len() + lower.len() + 3);
    if let (Some(a), Some(b)) = (&from.lead, &to.lead) {
        commands.push(lerp_command(a, b, b.verb, t));
    }
    commands.extend(upper);
    if let (Some(a), Some(b)) = (&from.trailing, &to.trailing) {
        commands.push(lerp_command(a, b, b.verb, t));
    }
    commands.extend(lower);
    if commands.is_empty() {
        return None;
    }
    for (i, command) in commands.iter_mut().enumerate() {
        if i == 0 && command.verb != PathVerb::Move {
            *command = command.reshaped(PathVerb::Move);
        } else if i > 0 && command.verb == PathVerb::Move {
            *command = command.reshaped(PathVerb::Line);
        }
    }
    commands.push(PathCommand::close());
    Some(PathGeometry::from_commands(commands))
}

/// Blends the numbers of two strings whose non-numeric text matches;
/// otherwise snaps to the nearer snapshot.
fn lerp_numeric_tokens(start: &str, end: &str, t: f64) -> String {
    let (start_text, start_numbers) = split_numbers(start);
    let (end_text, end_numbers) = split_numbers(end);
    if start_text != end_text || start_numbers.len() != end_numbers.len() {
        return if t < 0.5 { start } else { end }.to_owned();
    }
    let mut out = String::with_capacity(start.len().max(end.len()));
    for (i, text) in start_text.iter().enumerate() {
        out.push_str(text);
        if let (Some(a), Some(b)) = (start_numbers.get(i), end_numbers.get(i)) {
            out.push_str(&format_coordinate(a * (1.0 - t) + b * t));
        }
    }
    out
}

/// Splits `input` into the text between numbers and the numbers themselves;
/// the text list is always one longer than the number list.
fn split_numbers(input: &str) -> (Vec<&str>, Vec<f64>) {
    let bytes = input.as_bytes();
    let mut texts = Vec::new();
    let mut numbers = Vec::new();
    let mut text_start = 0;
    let mut index = 0;
    while index < bytes.len() {
        if let Some(end) = number_end(bytes, index) {
            if let Ok(value) = input[index..end].parse::<f64>() {
                texts.push(&input[text_start..index]);
                numbers.push(value);
                index = end;
                text_start = end;
                continue;
            }
        }
        index += 1;
    }
    texts.push(&input[text_start..]);
    (texts, numbers)
}

fn number_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut index = start;
    if matches!(bytes[index], b'-' | b'+') {
        index += 1;
    }
    let digits_start = index;
    while index < bytes.len() && bytes[index].is_ascii_digit() {
        index += 1;
    }
    let integer_digits = index - digits_start;
    let mut fraction_digits = 0;
    if index < bytes.len() && bytes[index] == b'.' {
        index += 1;
        while index < bytes.len() && bytes[index].is_ascii_digit() {
            index += 1;
            fraction_digits += 1;
        }
    }
    if integer_digits + fraction_digits == 0 {
        return None;
    }
    if index < bytes.len() && matches!(bytes[index], b'e' | b'E') {
        let mut exponent = index + 1;
        if exponent < bytes.len() && matches!(bytes[exponent], b'-' | b'+') {
            exponent += 1;
        }
        let exponent_digits = exponent;
        while exponent < bytes.len() && bytes[exponent].is_ascii_digit() {
            exponent += 1;
        }
        if exponent > exponent_digits {
            index = exponent;
        }
    }
    Some(index)
}
