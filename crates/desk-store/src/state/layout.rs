//! 레이아웃 슬라이스 (사이드바, 테마, 반응형 구간, 화면 전환 로딩).

use crate::action::Action;
use desk_core::Theme;

/// 태블릿 구간 시작 너비 (px).
pub const TABLET_MIN_WIDTH: u32 = 768;
/// 데스크톱 구간 시작 너비 (px).
pub const DESKTOP_MIN_WIDTH: u32 = 1024;

/// 반응형 구간.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Breakpoint {
    Mobile,
    Tablet,
    Desktop,
}

impl Breakpoint {
    /// 화면 너비로 구간을 정합니다.
    pub fn from_width(width: u32) -> Self {
        if width < TABLET_MIN_WIDTH {
            Breakpoint::Mobile
        } else if width < DESKTOP_MIN_WIDTH {
            Breakpoint::Tablet
        } else {
            Breakpoint::Desktop
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutState {
    pub sidebar_open: bool,
    pub theme: Theme,
    pub viewport_width: u32,
    pub breakpoint: Breakpoint,
    pub route: String,
    /// 화면 전환 중
    pub route_loading: bool,
}

impl Default for LayoutState {
    fn default() -> Self {
        Self {
            sidebar_open: true,
            theme: Theme::default(),
            viewport_width: 1280,
            breakpoint: Breakpoint::Desktop,
            route: "/".to_string(),
            route_loading: false,
        }
    }
}

impl LayoutState {
    pub(crate) fn reduce(&mut self, action: &Action) -> bool {
        match action {
            Action::ToggleSidebar => {
                self.sidebar_open = !self.sidebar_open;
                true
            }
            Action::SetSidebarOpen(open) => {
                let changed = self.sidebar_open != *open;
                self.sidebar_open = *open;
                changed
            }
            Action::SetTheme(theme) => {
                let changed = self.theme != *theme;
                self.theme = *theme;
                changed
            }
            Action::ToggleTheme => {
                self.theme = self.theme.toggled();
                true
            }
            Action::ViewportResized(width) => {
                let breakpoint = Breakpoint::from_width(*width);
                // 구간이 바뀔 때만 사이드바를 자동으로 열고 닫습니다.
                if breakpoint != self.breakpoint {
                    self.sidebar_open = breakpoint != Breakpoint::Mobile;
                }
                self.viewport_width = *width;
                self.breakpoint = breakpoint;
                true
            }
            Action::RouteChangeStarted(route) => {
                self.route = route.clone();
                self.route_loading = true;
                if self.breakpoint == Breakpoint::Mobile {
                    self.sidebar_open = false;
                }
                true
            }
            Action::RouteChangeFinished => {
                let changed = self.route_loading;
                self.route_loading = false;
                changed
            }
            _ => false,
        }
    }

    pub fn is_mobile(&self) -> bool {
        self.breakpoint == Breakpoint::Mobile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakpoints() {
        assert_eq!(Breakpoint::from_width(375), Breakpoint::Mobile);
        assert_eq!(Breakpoint::from_width(767), Breakpoint::Mobile);
        assert_eq!(Breakpoint::from_width(768), Breakpoint::Tablet);
        assert_eq!(Breakpoint::from_width(1023), Breakpoint::Tablet);
        assert_eq!(Breakpoint::from_width(1024), Breakpoint::Desktop);
    }

    #[test]
    fn test_sidebar_collapses_on_mobile() {
        let mut layout = LayoutState::default();
        layout.reduce(&Action::ViewportResized(400));
        assert!(layout.is_mobile());
        assert!(!layout.sidebar_open);

        // 같은 구간 안에서는 사용자가 연 사이드바를 유지
        layout.reduce(&Action::ToggleSidebar);
        layout.reduce(&Action::ViewportResized(420));
        assert!(layout.sidebar_open);

        layout.reduce(&Action::ViewportResized(1440));
        assert!(layout.sidebar_open);
    }

    #[test]
    fn test_route_loading_flag() {
        let mut layout = LayoutState::default();
        layout.reduce(&Action::RouteChangeStarted("/withdrawals".into()));
        assert!(layout.route_loading);
        assert_eq!(layout.route, "/withdrawals");

        assert!(layout.reduce(&Action::RouteChangeFinished));
        assert!(!layout.route_loading);
        assert!(!layout.reduce(&Action::RouteChangeFinished));
    }

    #[test]
    fn test_theme_toggle() {
        let mut layout = LayoutState::default();
        layout.reduce(&Action::ToggleTheme);
        assert_eq!(layout.theme, Theme::Light);
        assert!(!layout.reduce(&Action::SetTheme(Theme::Light)));
    }
}
