use std::fmt;

/// A notable anniversary, counted in days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Milestone {
    FirstDay,
    OneWeek,
    OneMonth,
    HundredDays,
    OneYear,
    TwoYears,
    Years(u32),
}

impl Milestone {
    /// The milestone reached on exactly `days`, if any
    pub fn for_days(days: u32) -> Option<Self> {
        match days {
            0 => Some(Milestone::FirstDay),
            7 => Some(Milestone::OneWeek),
            30 => Some(Milestone::OneMonth),
            100 => Some(Milestone::HundredDays),
            365 => Some(Milestone::OneYear),
            730 => Some(Milestone::TwoYears),
            d if d % 365 == 0 => Some(Milestone::Years(d / 365)),
            _ => None,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Milestone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Milestone::FirstDay => write!(f, "Today is your first day!"),
            Milestone::OneWeek => write!(f, "One week together!"),
            Milestone::OneMonth => write!(f, "One month together!"),
            Milestone::HundredDays => write!(f, "100 days together!"),
            Milestone::OneYear => write!(f, "One year together!"),
            Milestone::TwoYears => write!(f, "Two years together!"),
            Milestone::Years(n) => write!(f, "{} years together!", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_milestones() {
        assert_eq!(Milestone::for_days(0), Some(Milestone::FirstDay));
        assert_eq!(Milestone::for_days(7), Some(Milestone::OneWeek));
        assert_eq!(Milestone::for_days(30), Some(Milestone::OneMonth));
        assert_eq!(Milestone::for_days(100), Some(Milestone::HundredDays));
        assert_eq!(Milestone::for_days(365), Some(Milestone::OneYear));
        assert_eq!(Milestone::for_days(730), Some(Milestone::TwoYears));
    }

    #[test]
    fn test_later_years_use_generic_message() {
        assert_eq!(Milestone::for_days(1095), Some(Milestone::Years(3)));
        assert_eq!(Milestone::for_days(1095).unwrap().message(), "3 years together!");
        assert_eq!(Milestone::for_days(3650).unwrap().message(), "10 years together!");
    }

    #[test]
    fn test_ordinary_days() {
        for days in [1, 6, 8, 29, 99, 101, 364, 366, 729, 800, 1094] {
            assert_eq!(Milestone::for_days(days), None, "day {}", days);
        }
    }

    #[test]
    fn test_messages() {
        assert_eq!(Milestone::FirstDay.message(), "Today is your first day!");
        assert_eq!(Milestone::HundredDays.to_string(), "100 days together!");
    }
}
