use crate::detector::{Detection, DetectorFactory, PersonDetector};
use crate::error::AppError;

#[derive(Debug, Clone, Copy)]
pub struct MockDetectorBehavior {
    pub create_ok: bool,
    pub detect_ok: bool,
    pub count: u32,
    pub confidence: f64,
}

impl MockDetectorBehavior {
    pub fn ok() -> Self {
        Self {
            create_ok: true,
            detect_ok: true,
            count: 0,
            confidence: 1.0,
        }
    }

    pub fn with_detection(count: u32, confidence: f64) -> Self {
        Self {
            create_ok: true,
            detect_ok: true,
            count,
            confidence,
        }
    }

    pub fn fail_create() -> Self {
        Self {
            create_ok: false,
            detect_ok: true,
            count: 0,
            confidence: 1.0,
        }
    }

    pub fn fail_detect() -> Self {
        Self {
            create_ok: true,
            detect_ok: false,
            count: 0,
            confidence: 1.0,
        }
    }
}

pub struct MockDetectorFactory {
    behaviors: Vec<MockDetectorBehavior>,
    next_index: usize,
}

impl MockDetectorFactory {
    pub fn new(behaviors: Vec<MockDetectorBehavior>) -> Self {
        Self {
            behaviors,
            next_index: 0,
        }
    }

    fn next_behavior(&mut self) -> MockDetectorBehavior {
        let behavior = self
            .behaviors
            .get(self.next_index)
            .copied()
            .unwrap_or_else(MockDetectorBehavior::ok);
        self.next_index += 1;
        behavior
    }
}

pub struct MockDetector {
    behavior: MockDetectorBehavior,
}

impl PersonDetector for MockDetector {
    fn detect(&mut self) -> Result<Detection, AppError> {
        if self.behavior.detect_ok {
            Ok(Detection {
                count: self.behavior.count,
                confidence: self.behavior.confidence,
            })
        } else {
            Err(AppError::Detector("mock detect failed".to_string()))
        }
    }
}

impl DetectorFactory for MockDetectorFactory {
    type Detector = MockDetector;

    fn create_for_camera(&mut self, _camera_id: &str) -> Result<Self::Detector, AppError> {
        let behavior = self.next_behavior();
        if behavior.create_ok {
            Ok(MockDetector { behavior })
        } else {
            Err(AppError::Detector("mock create failed".to_string()))
        }
    }
}
