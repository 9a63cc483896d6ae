pub mod grand_capital;
pub mod intrade_bar;

use crate::calendar::TimeWindow;
use crate::status::Status;

pub(crate) fn window_status(window: TimeWindow) -> Status {
    match window {
        TimeWindow::Open => Status::Ok,
        TimeWindow::DayOff => Status::DayOff,
        TimeWindow::NightHours => Status::NightHours,
        TimeWindow::ShoulderMinutes => Status::ShoulderMinutes,
        TimeWindow::FeedBlackout => Status::FeedBlackout,
    }
}
