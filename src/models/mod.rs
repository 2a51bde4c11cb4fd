//! Data models for the inventory server

pub mod department;
pub mod enums;
pub mod equipment;
pub mod import_report;
pub mod maintenance;
pub mod record;
pub mod stats;
pub mod user;

// Re-export commonly used types
pub use department::{Department, DepartmentSummary};
pub use enums::{EquipmentStatus, Role};
pub use equipment::Equipment;
pub use maintenance::{MaintenanceLog, MaintenanceLogList};
pub use record::DepartmentRecord;
pub use user::{User, UserClaims};

/// Page/per-page normalization shared by every paginated listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub per_page: i64,
}

impl PageWindow {
    pub const DEFAULT_PER_PAGE: i64 = 20;
    pub const MAX_PER_PAGE: i64 = 200;

    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page
                .unwrap_or(Self::DEFAULT_PER_PAGE)
                .clamp(1, Self::MAX_PER_PAGE),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

#[cfg(test)]
mod tests {
    use super::PageWindow;

    #[test]
    fn test_page_window_clamps() {
        let w = PageWindow::new(None, None);
        assert_eq!((w.page, w.per_page, w.offset()), (1, 20, 0));

        let w = PageWindow::new(Some(0), Some(10_000));
        assert_eq!((w.page, w.per_page), (1, 200));

        let w = PageWindow::new(Some(3), Some(25));
        assert_eq!(w.offset(), 50);
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let w = PageWindow::new(Some(i64::MAX), Some(20));
        assert_eq!(w.offset(), i64::MAX);
        assert!(w.offset() >= 0);
    }
}
