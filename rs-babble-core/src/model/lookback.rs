/// Two-unit lookback window shared by the builder and the walk.
///
/// Holds the units seen just before the current one. Order-2 and order-3
/// context keys are only available once the window has one or two units.
#[derive(Clone, Debug, Default)]
pub(crate) struct Lookback {
	one_ago: Option<String>,
	two_ago: Option<String>,
}

impl Lookback {
	/// Shifts the window: `two_ago = one_ago`, `one_ago = unit`.
	pub fn advance(&mut self, unit: &str) {
		self.two_ago = self.one_ago.replace(unit.to_owned());
	}

	/// Context keys ending with `current`, most specific first.
	///
	/// Each entry is `(order, key)`; the order-1 key is always present.
	pub fn context_keys(&self, current: &str) -> Vec<(usize, String)> {
		let mut keys = Vec::with_capacity(3);
		if let Some(one) = &self.one_ago {
			if let Some(two) = &self.two_ago {
				keys.push((3, format!("{two} {one} {current}")));
			}
			keys.push((2, format!("{one} {current}")));
		}
		keys.push((1, current.to_owned()));
		keys
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn starts_with_order_one_only() {
		let lookback = Lookback::default();
		assert_eq!(lookback.context_keys("a"), vec![(1, "a".to_owned())]);
	}

	#[test]
	fn grows_to_order_three() {
		let mut lookback = Lookback::default();
		lookback.advance("a");
		assert_eq!(lookback.context_keys("b"), vec![(2, "a b".to_owned()), (1, "b".to_owned())]);

		lookback.advance("b");
		lookback.advance("c");
		assert_eq!(
			lookback.context_keys("d"),
			vec![(3, "b c d".to_owned()), (2, "c d".to_owned()), (1, "d".to_owned())]
		);
	}
}
