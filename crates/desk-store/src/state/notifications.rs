//! 알림 패널 슬라이스.
//!
//! 패널 상태: `Closed → Open(Loading) → Open(Loaded) | Open(Error)`.
//! 패널을 닫아도 목록은 그대로 두며, 폴링 결과는 닫힌 상태에서도 반영됩니다.
//!
//! 읽음/삭제 처리와 로컬에서 추가한 알림은 슬라이스가 기억해 두고,
//! 폴링으로 받은 목록 위에 다시 적용합니다.

use crate::action::Action;
use crate::sequence::{FetchChannel, RequestSeq};
use desk_core::Notification;
use std::collections::HashSet;

/// 열린 패널의 내용 상태.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelContent {
    Loading,
    Loaded,
    Error(String),
}

/// 알림 패널 표시 상태.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PanelState {
    #[default]
    Closed,
    Open(PanelContent),
}

impl PanelState {
    pub fn is_open(&self) -> bool {
        matches!(self, PanelState::Open(_))
    }
}

/// 알림 슬라이스.
#[derive(Debug, Clone, Default)]
pub struct NotificationsState {
    pub panel: PanelState,
    /// 최신순
    pub items: Vec<Notification>,
    /// 읽지 않은 알림 수 (`items`와 항상 일치)
    pub unread_count: usize,
    /// 로컬에서 읽음 처리한 ID
    read_ids: HashSet<String>,
    /// 로컬에서 삭제한 ID
    deleted_ids: HashSet<String>,
    /// 백엔드 목록에 아직 없는 로컬 알림 ID
    local_ids: HashSet<String>,
    issued_seq: RequestSeq,
    applied_seq: RequestSeq,
}

impl NotificationsState {
    pub(crate) fn reduce(&mut self, action: &Action) -> bool {
        match action {
            Action::OpenNotificationPanel => {
                if self.panel.is_open() {
                    return false;
                }
                self.panel = PanelState::Open(PanelContent::Loading);
                true
            }
            Action::CloseNotificationPanel => {
                if !self.panel.is_open() {
                    return false;
                }
                self.panel = PanelState::Closed;
                true
            }
            Action::FetchStarted {
                channel: FetchChannel::Notifications,
                seq,
            } => {
                self.issued_seq = self.issued_seq.max(*seq);
                if self.panel.is_open() && self.items.is_empty() {
                    self.panel = PanelState::Open(PanelContent::Loading);
                }
                true
            }
            Action::NotificationsFetched { seq, result } => {
                if *seq <= self.applied_seq {
                    return false;
                }
                self.applied_seq = *seq;
                match result {
                    Ok(items) => {
                        self.merge_fetched(items);
                        if self.panel.is_open() {
                            self.panel = PanelState::Open(PanelContent::Loaded);
                        }
                    }
                    Err(message) => {
                        if self.panel.is_open() {
                            self.panel = PanelState::Open(PanelContent::Error(message.clone()));
                        }
                    }
                }
                true
            }
            Action::NotificationReceived(notification) => {
                if self.items.iter().any(|n| n.id == notification.id) {
                    return false;
                }
                if !notification.read {
                    self.unread_count += 1;
                }
                self.local_ids.insert(notification.id.clone());
                self.items.insert(0, notification.clone());
                true
            }
            Action::MarkNotificationRead(id) => {
                match self.items.iter_mut().find(|n| &n.id == id && !n.read) {
                    Some(item) => {
                        item.read = true;
                        self.unread_count -= 1;
                        self.read_ids.insert(id.clone());
                        true
                    }
                    None => false,
                }
            }
            Action::MarkAllNotificationsRead => {
                for item in &mut self.items {
                    item.read = true;
                    self.read_ids.insert(item.id.clone());
                }
                self.unread_count = 0;
                true
            }
            Action::DeleteNotification(id) => {
                let Some(index) = self.items.iter().position(|n| &n.id == id) else {
                    return false;
                };
                let removed = self.items.remove(index);
                if !removed.read {
                    self.unread_count -= 1;
                }
                self.local_ids.remove(id);
                self.read_ids.remove(id);
                self.deleted_ids.insert(id.clone());
                true
            }
            _ => false,
        }
    }

    /// 응답을 기다리는 요청이 있는지 확인합니다.
    pub fn is_loading(&self) -> bool {
        self.applied_seq < self.issued_seq
    }

    /// 백엔드 목록을 받아 로컬 변경을 다시 적용합니다.
    ///
    /// 삭제한 항목은 빼고, 읽음 처리한 항목은 읽음으로 두며, 백엔드에 아직
    /// 없는 로컬 알림은 유지합니다. 결과는 최신순입니다.
    fn merge_fetched(&mut self, fetched: &[Notification]) {
        let fetched_ids: HashSet<&str> = fetched.iter().map(|n| n.id.as_str()).collect();
        self.local_ids.retain(|id| !fetched_ids.contains(id.as_str()));

        let mut merged: Vec<Notification> = self
            .items
            .iter()
            .filter(|n| self.local_ids.contains(&n.id))
            .cloned()
            .collect();
        merged.extend(
            fetched
                .iter()
                .filter(|n| !self.deleted_ids.contains(&n.id))
                .cloned()
                .map(|mut n| {
                    if self.read_ids.contains(&n.id) {
                        n.read = true;
                    }
                    n
                }),
        );
        merged.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        self.items = merged;
        self.recount();
    }

    fn recount(&mut self) {
        self.unread_count = self.items.iter().filter(|n| !n.read).count();
    }
}
