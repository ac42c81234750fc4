//! Construction evaluation
//!
//! The single resolver mapping each construction variant to its analytic
//! algorithm. `Ok(None)` means the construction is geometrically undefined
//! for the given inputs in this realization; that is a normal outcome, not
//! an error. `Err` is reserved for structural contract violations.

use super::picture::AnalyticObject;
use crate::error::GenerationError;
use crate::geometry::{internal_angle_bisector, perpendicular_bisector, Circle, Line};
use crate::ir::{ComposedConstruction, Construction, PredefinedConstruction};

/// Evaluate one construction application on concrete analytic inputs.
pub fn evaluate_construction(
    construction: &Construction,
    inputs: &[AnalyticObject],
) -> Result<Option<Vec<AnalyticObject>>, GenerationError> {
    match construction {
        Construction::Predefined(predefined) => evaluate_predefined(*predefined, inputs),
        Construction::Composed(composed) => evaluate_composed(composed, inputs),
    }
}

fn evaluate_predefined(
    construction: PredefinedConstruction,
    inputs: &[AnalyticObject],
) -> Result<Option<Vec<AnalyticObject>>, GenerationError> {
    use AnalyticObject::{Line as L, Point as P};
    use PredefinedConstruction::*;

    let result: Option<AnalyticObject> = match (construction, inputs) {
        (Midpoint, [P(a), P(b)]) => Some(a.midpoint(b).into()),
        (LineFromPoints, [P(a), P(b)]) => Line::through(a, b).map(Into::into),
        (Circumcircle, [P(a), P(b), P(c)]) => Circle::circumcircle(a, b, c).map(Into::into),
        (CircleWithCenterThroughPoint, [P(center), P(through)]) => {
            Circle::from_center_and_point(center, through).map(Into::into)
        }
        (IntersectionOfLines, [L(a), L(b)]) => a.intersection(b).map(Into::into),
        (PerpendicularLine, [P(p), L(l)]) => Some(l.perpendicular_through(p).into()),
        (ParallelLine, [P(p), L(l)]) => Some(l.parallel_through(p).into()),
        (PerpendicularBisector, [P(a), P(b)]) => perpendicular_bisector(a, b).map(Into::into),
        (InternalAngleBisector, [P(vertex), P(a), P(b)]) => {
            internal_angle_bisector(vertex, a, b).map(Into::into)
        }
        (PointReflection, [P(subject), P(center)]) => {
            Some(subject.reflect_through(center).into())
        }
        (ReflectionInLine, [P(p), L(l)]) => Some(l.reflect(p).into()),
        (PerpendicularProjection, [P(p), L(l)]) => Some(l.project(p).into()),
        (SecondIntersectionOfTwoCircumcircles, [P(a), P(b), P(c), P(d), P(e)]) => {
            match (Circle::circumcircle(a, b, c), Circle::circumcircle(a, d, e)) {
                (Some(first), Some(second)) if first != second => {
                    first.second_intersection_with_circle(&second, a).map(Into::into)
                }
                // Identical circumcircles have no single second intersection
                _ => None,
            }
        }
        (SecondIntersectionOfCircleAndLineFromPoints, [P(a), P(b), P(c), P(d)]) => {
            match (Line::through(a, b), Circle::circumcircle(a, c, d)) {
                (Some(line), Some(circle)) => {
                    Some(circle.second_intersection_with_line(&line, a).into())
                }
                _ => None,
            }
        }
        _ => {
            return Err(GenerationError::InvalidArguments {
                construction: construction.id().to_string(),
                details: format!(
                    "analytic input kinds {:?} do not match the signature",
                    inputs.iter().map(AnalyticObject::kind).collect::<Vec<_>>()
                ),
            })
        }
    };

    Ok(result.map(|value| vec![value]))
}

/// Evaluate a composed construction by binding its defining configuration's
/// loose objects to the inputs and running every internal step.
fn evaluate_composed(
    composed: &ComposedConstruction,
    inputs: &[AnalyticObject],
) -> Result<Option<Vec<AnalyticObject>>, GenerationError> {
    let definition = &composed.definition;
    if inputs.len() != definition.loose_count()
        || inputs
            .iter()
            .zip(definition.loose())
            .any(|(value, kind)| value.kind() != *kind)
    {
        return Err(GenerationError::InvalidArguments {
            construction: composed.name.clone(),
            details: "inputs do not match the defining configuration's loose objects".to_string(),
        });
    }

    let mut values: Vec<AnalyticObject> = inputs.to_vec();
    for object in definition.constructed() {
        let args: Vec<AnalyticObject> =
            object.args.iter().map(|arg| values[arg.index()]).collect();
        let outputs = match evaluate_construction(&object.construction, &args)? {
            Some(outputs) => outputs,
            None => return Ok(None),
        };
        let value = *outputs.get(object.output_index as usize).ok_or_else(|| {
            GenerationError::WrongOutputCount {
                construction: object.construction.id().to_string(),
                expected: object.construction.signature().output.len(),
                got: outputs.len(),
            }
        })?;
        values.push(value);
    }

    Ok(Some(
        composed.outputs.iter().map(|id| values[id.index()]).collect(),
    ))
}
