use imageproc::rect::Rect;
use nalgebra::Point2;

/// Bounding box in the format (x, y, width, height), pixel units, origin is the top-left corner
///
/// The same type represents a blob detected in the current frame and the rectangle of a track.
///
#[derive(Clone, Default, Debug, Copy, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    _x: i32,
    _y: i32,
    _width: i32,
    _height: i32,
}

impl BoundingBox {
    /// Constructor
    ///
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        assert!(
            width >= 0 && height >= 0,
            "Width and height must be non-negative"
        );
        Self {
            _x: x,
            _y: y,
            _width: width,
            _height: height,
        }
    }

    pub fn x(&self) -> i32 {
        self._x
    }

    pub fn y(&self) -> i32 {
        self._y
    }

    pub fn width(&self) -> i32 {
        self._width
    }

    pub fn height(&self) -> i32 {
        self._height
    }

    pub fn area(&self) -> i64 {
        self._width as i64 * self._height as i64
    }

    /// The corner the default association rule compares
    ///
    pub fn top_left(&self) -> Point2<f32> {
        Point2::new(self._x as f32, self._y as f32)
    }

    pub fn center(&self) -> Point2<f32> {
        Point2::new(
            self._x as f32 + self._width as f32 / 2.0,
            self._y as f32 + self._height as f32 / 2.0,
        )
    }

    /// Converts to the drawing rectangle; degenerate boxes have no counterpart
    ///
    pub fn as_rect(&self) -> Option<Rect> {
        if self._width > 0 && self._height > 0 {
            Some(Rect::at(self._x, self._y).of_size(self._width as u32, self._height as u32))
        } else {
            None
        }
    }
}

impl From<Rect> for BoundingBox {
    fn from(r: Rect) -> Self {
        BoundingBox::new(r.left(), r.top(), r.width() as i32, r.height() as i32)
    }
}

#[cfg(feature = "python")]
pub mod python {
    use pyo3::prelude::*;

    use super::BoundingBox;

    #[pyclass]
    #[pyo3(name = "BoundingBox")]
    #[derive(Clone, Debug)]
    #[repr(transparent)]
    pub struct PyBoundingBox(pub(crate) BoundingBox);

    #[pymethods]
    impl PyBoundingBox {
        #[classattr]
        const __hash__: Option<Py<PyAny>> = None;

        #[new]
        fn new(x: i32, y: i32, width: i32, height: i32) -> PyResult<Self> {
            if width < 0 || height < 0 {
                return Err(pyo3::exceptions::PyValueError::new_err(
                    "Width and height must be non-negative",
                ));
            }
            Ok(Self(BoundingBox::new(x, y, width, height)))
        }

        fn __repr__(&self) -> String {
            format!("{:?}", self.0)
        }

        fn __str__(&self) -> String {
            self.__repr__()
        }

        #[getter]
        fn x(&self) -> i32 {
            self.0.x()
        }

        #[getter]
        fn y(&self) -> i32 {
            self.0.y()
        }

        #[getter]
        fn width(&self) -> i32 {
            self.0.width()
        }

        #[getter]
        fn height(&self) -> i32 {
            self.0.height()
        }

        fn center(&self) -> (f32, f32) {
            let c = self.0.center();
            (c.x, c.y)
        }
    }
}
