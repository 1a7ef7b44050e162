use crate::sink::MeasurementPoint;

/// Points collected during a single tick, exported as one unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    points: Vec<MeasurementPoint>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, point: MeasurementPoint) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[MeasurementPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
