use super::{Workbench, LOG_BUFFER_CAP, MAX_LOG_DRAIN_PER_TICK};
use crate::kernel::Action;
use std::sync::mpsc;

impl Workbench {
    /// 主循环每轮调用：收取 I/O 完成、监听事件和日志，再推进去抖定时器
    pub fn tick(&mut self) -> bool {
        let mut changed = false;
        changed |= self.poll_kernel_bus();
        changed |= self.poll_watchers();
        changed |= self.poll_logs();
        changed |= self.dispatch(Action::Tick);
        changed
    }

    fn poll_kernel_bus(&mut self) -> bool {
        let mut changed = false;
        for action in self.bus_rx.drain_actions() {
            changed |= self.dispatch(action);
        }
        changed
    }

    fn poll_watchers(&mut self) -> bool {
        let mut changed = false;
        for action in self.watchers.drain() {
            changed |= self.dispatch(action);
        }
        changed
    }

    fn poll_logs(&mut self) -> bool {
        let Some(rx) = self.log_rx.as_ref() else {
            return false;
        };

        let mut changed = false;
        let mut disconnected = false;
        for _ in 0..MAX_LOG_DRAIN_PER_TICK {
            match rx.try_recv() {
                Ok(line) => {
                    if self.logs.len() >= LOG_BUFFER_CAP {
                        self.logs.pop_front();
                    }
                    self.logs.push_back(line);
                    changed = true;
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    disconnected = true;
                    break;
                }
            }
        }
        if disconnected {
            self.log_rx = None;
        }
        changed
    }
}
