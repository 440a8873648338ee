/*!

Without the `logging` feature there is no console backend. Topic caps need a backend to apply
them, so only the facade's maximum level follows the global level, and an application-installed
logger still sees propmodel's messages.

*/

use crate::log::LogConfiguration;

impl LogConfiguration {
    pub(in crate::log) fn apply(&mut self) {
        log::set_max_level(self.global_log_level);
    }
}
