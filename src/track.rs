use crate::utils::bbox::BoundingBox;
use crate::utils::color::Color;
use nalgebra::{Point2, Vector2};
use std::collections::VecDeque;

/// Track lifecycle notifications
pub mod notify;

/// Persistent state of one tracked object
///
#[derive(Debug, Clone)]
pub struct ObjectTrack {
    /// id of the track, unique within the session and never reused
    ///
    pub id: u64,
    /// the bbox of the blob lastly matched (or the one the track was created from)
    ///
    pub rect: BoundingBox,
    /// displacement of the top-left corner caused by the last match
    ///
    pub velocity: Vector2<f32>,
    /// centers of the matched bboxes, oldest first
    ///
    pub history: VecDeque<Point2<f32>>,
    /// the track was created or matched during the last processed frame
    ///
    pub updated: bool,
    /// display color
    ///
    pub color: Color,
    /// the number of frames the track is alive: the creation frame plus every matched frame
    ///
    pub length: usize,
}

impl ObjectTrack {
    pub(crate) fn new(id: u64, rect: BoundingBox, color: Color) -> Self {
        Self {
            id,
            rect,
            velocity: Vector2::zeros(),
            history: VecDeque::default(),
            updated: true,
            color,
            length: 1,
        }
    }

    /// Moves the track to the matched blob
    ///
    /// # Parameters
    /// * `blob` - the blob claimed by the track
    /// * `history_length` - the maximum number of kept history points, `0` keeps all of them
    ///
    pub(crate) fn update(&mut self, blob: BoundingBox, history_length: usize) {
        self.velocity = blob.top_left() - self.rect.top_left();
        self.rect = blob;
        self.history.push_back(blob.center());
        if history_length > 0 && self.history.len() > history_length {
            self.history.pop_front();
        }
        self.updated = true;
        self.length += 1;
    }
}

#[cfg(feature = "python")]
pub mod python {
    use pyo3::prelude::*;

    use crate::utils::bbox::python::PyBoundingBox;

    use super::ObjectTrack;

    #[pyclass]
    #[pyo3(name = "ObjectTrack")]
    #[derive(Debug, Clone)]
    #[repr(transparent)]
    pub struct PyObjectTrack(pub(crate) ObjectTrack);

    #[pymethods]
    impl PyObjectTrack {
        #[classattr]
        const __hash__: Option<Py<PyAny>> = None;

        fn __repr__(&self) -> String {
            format!("{:?}", self.0)
        }

        fn __str__(&self) -> String {
            format!("{:#?}", self.0)
        }

        #[getter]
        fn id(&self) -> u64 {
            self.0.id
        }

        #[getter]
        fn rect(&self) -> PyBoundingBox {
            PyBoundingBox(self.0.rect)
        }

        #[getter]
        fn velocity(&self) -> (f32, f32) {
            (self.0.velocity.x, self.0.velocity.y)
        }

        #[getter]
        fn history(&self) -> Vec<(f32, f32)> {
            self.0.history.iter().map(|p| (p.x, p.y)).collect()
        }

        #[getter]
        fn updated(&self) -> bool {
            self.0.updated
        }

        #[getter]
        fn color(&self) -> (u8, u8, u8) {
            (self.0.color.r, self.0.color.g, self.0.color.b)
        }

        #[getter]
        fn length(&self) -> usize {
            self.0.length
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::track::ObjectTrack;
    use crate::utils::bbox::BoundingBox;
    use crate::utils::color::Color;
    use crate::EPS;

    #[test]
    fn construct() {
        let t = ObjectTrack::new(3, BoundingBox::new(10, 10, 20, 20), Color::default());
        assert_eq!(t.id, 3);
        assert!(t.updated);
        assert!(t.history.is_empty());
        assert_eq!(t.length, 1);
        assert!(t.velocity.norm() < EPS);
    }

    #[test]
    fn update() {
        let mut t = ObjectTrack::new(0, BoundingBox::new(10, 10, 20, 20), Color::default());
        t.updated = false;
        t.update(BoundingBox::new(12, 11, 20, 20), 0);

        assert!(t.updated);
        assert_eq!(t.rect, BoundingBox::new(12, 11, 20, 20));
        assert!((t.velocity.x - 2.0).abs() < EPS);
        assert!((t.velocity.y - 1.0).abs() < EPS);
        assert_eq!(t.history.len(), 1);
        assert!((t.history[0].x - 22.0).abs() < EPS);
        assert!((t.history[0].y - 21.0).abs() < EPS);
        assert_eq!(t.length, 2);
    }

    #[test]
    fn bounded_history() {
        let mut t = ObjectTrack::new(0, BoundingBox::new(0, 0, 2, 2), Color::default());
        for i in 1..=5 {
            t.update(BoundingBox::new(i, 0, 2, 2), 3);
        }
        assert_eq!(t.history.len(), 3);
        let xs = t.history.iter().map(|p| p.x).collect::<Vec<_>>();
        assert_eq!(xs, vec![4.0, 5.0, 6.0]);
        assert_eq!(t.length, 6);
    }
}
