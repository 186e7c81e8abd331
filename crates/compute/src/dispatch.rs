use crate::{ComputeError, Kernel};

/// Side of a render tile and width of a preprocess workgroup.
pub const THREAD_COUNT: u32 = 16;

/// Workgroup counts for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchPlan {
    pub preprocess: [u32; 3],
    pub render: [u32; 3],
}

impl DispatchPlan {
    /// # Errors
    ///
    /// [`ComputeError::Resolution`] if `resolution` is not a positive
    /// multiple of [`THREAD_COUNT`].
    pub fn new(total_shapes: usize, resolution: u32) -> Result<Self, ComputeError> {
        let tiles = validate_resolution(resolution)? / THREAD_COUNT;
        Ok(Self {
            preprocess: [preprocess_workgroups(total_shapes), 1, 1],
            render: [tiles, tiles, 1],
        })
    }

    #[must_use]
    pub const fn workgroups(&self, kernel: Kernel) -> [u32; 3] {
        match kernel {
            Kernel::Preprocess => self.preprocess,
            Kernel::Render => self.render,
        }
    }
}

/// `ceil(total / THREAD_COUNT)`, but at least one workgroup so the kernel is
/// always dispatched.
#[must_use]
pub fn preprocess_workgroups(total_shapes: usize) -> u32 {
    let total = u32::try_from(total_shapes).unwrap_or(u32::MAX);
    total.div_ceil(THREAD_COUNT).max(1)
}

/// # Errors
///
/// [`ComputeError::Resolution`] for zero or a non-multiple of [`THREAD_COUNT`].
pub fn validate_resolution(resolution: u32) -> Result<u32, ComputeError> {
    if resolution == 0 || resolution % THREAD_COUNT != 0 {
        return Err(ComputeError::Resolution(resolution));
    }
    Ok(resolution)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preprocess_never_drops_to_zero() {
        assert_eq!(preprocess_workgroups(0), 1);
        assert_eq!(preprocess_workgroups(1), 1);
        assert_eq!(preprocess_workgroups(16), 1);
        assert_eq!(preprocess_workgroups(17), 2);
        assert_eq!(preprocess_workgroups(60), 4);
    }

    #[test]
    fn render_covers_the_frame() {
        let plan = DispatchPlan::new(2, 768).unwrap();
        assert_eq!(plan.render, [48, 48, 1]);
        assert_eq!(plan.preprocess, [1, 1, 1]);
        assert_eq!(plan.workgroups(Kernel::Render), plan.render);
    }

    #[test]
    fn rejects_untiled_resolutions() {
        assert!(matches!(DispatchPlan::new(0, 770), Err(ComputeError::Resolution(770))));
        assert!(matches!(validate_resolution(0), Err(ComputeError::Resolution(0))));
        assert_eq!(validate_resolution(512).unwrap(), 512);
    }
}
