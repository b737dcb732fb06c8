use crate::dice::Outcome;
use itertools::Itertools;
use std::fmt;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Severity {
    Info,
    Warning,
}

/// Fire-and-forget messages raised by the table for the player.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Notice {
    InsufficientBalance,
    NoBetPlaced,
    Won(u64),
    Lost,
    FavorActivated,
    OverrideArmed,
    WaitingForTap,
    ForcedResult(Outcome),
}

impl Notice {
    pub fn severity(&self) -> Severity {
        match self {
            Notice::InsufficientBalance | Notice::NoBetPlaced => Severity::Warning,
            _ => Severity::Info,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Notice::InsufficientBalance => "Không đủ xu!",
            Notice::NoBetPlaced => "Chưa đặt cược!",
            Notice::Won(_) => "🎉 Chúc mừng!",
            Notice::Lost => "😔 Không may",
            Notice::FavorActivated => "🎰 Chế độ may mắn kích hoạt!",
            Notice::OverrideArmed => "🎯 Chế độ điều khiển kích hoạt!",
            Notice::WaitingForTap => "👆 Đang chờ",
            Notice::ForcedResult(_) => "✅ Đã chọn kết quả",
        }
    }

    pub fn description(&self) -> String {
        match self {
            Notice::InsufficientBalance => {
                String::from("Bạn không có đủ xu để đặt cược.")
            }
            Notice::NoBetPlaced => String::from("Hãy đặt cược trước khi lắc xúc xắc."),
            Notice::Won(amount) => format!("Bạn thắng {} xu!", format_coins(*amount)),
            Notice::Lost => String::from("Hãy thử lại lần sau!"),
            Notice::FavorActivated => String::from("Xác suất thắng đã được tăng lên!"),
            Notice::OverrideArmed => {
                String::from("Chạm vào một con vật sau khi lắc để chọn kết quả.")
            }
            Notice::WaitingForTap => {
                String::from("Chạm vào một con vật để mở bát.")
            }
            Notice::ForcedResult(outcome) => {
                outcome.iter().map(|a| a.vietnamese()).join(" - ")
            }
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.title(), self.description())
    }
}

/// Groups thousands with dots, the way coin amounts are shown on the table.
pub fn format_coins(amount: u64) -> String {
    let digits = amount.to_string();
    let head = digits.len() % 3;
    let mut groups: Vec<&str> = Vec::new();
    if head > 0 {
        groups.push(&digits[..head]);
    }
    groups.extend(
        digits.as_bytes()[head..]
            .chunks(3)
            .filter_map(|chunk| std::str::from_utf8(chunk).ok()),
    );
    groups.join(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animal::Animal;

    #[test]
    fn coins_are_grouped_by_thousands() {
        assert_eq!(format_coins(0), "0");
        assert_eq!(format_coins(999), "999");
        assert_eq!(format_coins(10_000), "10.000");
        assert_eq!(format_coins(1_234_567), "1.234.567");
    }

    #[test]
    fn warnings_are_only_the_soft_rejections() {
        assert_eq!(Notice::NoBetPlaced.severity(), Severity::Warning);
        assert_eq!(Notice::InsufficientBalance.severity(), Severity::Warning);
        assert_eq!(Notice::Won(300).severity(), Severity::Info);
    }

    #[test]
    fn forced_result_lists_faces() {
        let notice = Notice::ForcedResult([Animal::Gourd; 3]);
        assert_eq!(notice.description(), "Bầu - Bầu - Bầu");
        assert_eq!(Notice::Won(10_000).description(), "Bạn thắng 10.000 xu!");
    }
}
