/// Phase of an order's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderState {
	Monitoring,
	Executing,
	Tracking,
	Completed,
	Expired,
}

impl OrderState {
	pub fn is_terminal(&self) -> bool {
		matches!(self, OrderState::Completed | OrderState::Expired)
	}

	pub fn can_transition_to(&self, to: OrderState) -> bool {
		use OrderState::*;

		match (self, to) {
			(Monitoring, Executing) => true,
			(Monitoring, Expired) => true,
			// Build or submission failed
			(Executing, Monitoring) => true,
			(Executing, Tracking) => true,
			(Tracking, Completed) => true,
			(Tracking, Monitoring) => true,
			_ => false,
		}
	}
}

impl std::fmt::Display for OrderState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Monitoring => write!(f, "Monitoring"),
			Self::Executing => write!(f, "Executing"),
			Self::Tracking => write!(f, "Tracking"),
			Self::Completed => write!(f, "Completed"),
			Self::Expired => write!(f, "Expired"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_terminal_states_are_final() {
		use OrderState::*;

		for from in [Completed, Expired] {
			assert!(from.is_terminal());
			for to in [Monitoring, Executing, Tracking, Completed, Expired] {
				assert!(!from.can_transition_to(to), "{} -> {}", from, to);
			}
		}
	}

	#[test]
	fn test_completion_requires_tracking() {
		assert!(!OrderState::Monitoring.can_transition_to(OrderState::Completed));
		assert!(!OrderState::Executing.can_transition_to(OrderState::Completed));
		assert!(OrderState::Tracking.can_transition_to(OrderState::Completed));
	}
}
