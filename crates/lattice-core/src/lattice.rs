//! Recombining binomial lattice stored in a flat triangular arena.
//!
//! Node `(k, j)` is the state after `k` steps of which `j` were up moves.
//! Up-then-down and down-then-up reach the same node, so depth `k` holds
//! `k + 1` nodes rather than `2^k`.
//!
//! ```text
//!                    [0,0]
//!                   /     \
//!              [1,1]       [1,0]
//!             /    \      /    \
//!         [2,2]     [2,1]       [2,0]
//! ```
//!
//! Node `(k, j)` lives at index `k(k+1)/2 + j`.

use serde::{Deserialize, Serialize};

use crate::parameters::LatticeParameters;

/// A lattice vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Depth (number of steps from the root).
    pub depth: usize,
    /// Number of up moves taken to reach this node.
    pub ups: usize,
    /// Underlying price at this node.
    pub price: f64,
    /// Risk-neutral probability of reaching this node from the root.
    pub probability: f64,
    /// Elapsed time from the valuation date, in years.
    pub time: f64,
    /// Option value, set during backward induction.
    pub option_value: Option<f64>,
    /// Arena index of the node that generated this one in the forward pass.
    pub parent: Option<usize>,
}

/// A fully materialised recombining lattice.
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    steps: usize,
    nodes: Vec<Node>,
}

impl Lattice {
    /// Builds the lattice forward from the root to maturity.
    ///
    /// Each frontier node `(k, j)` generates its down child `(k+1, j)` and,
    /// for the top node only, its up child `(k+1, k+1)`; every other up child
    /// `(k+1, j+1)` is the down child of `(k, j+1)`. Reach probabilities are
    /// accumulated from both parents.
    #[must_use]
    pub fn build(params: &LatticeParameters) -> Self {
        let steps = params.steps();
        let p = params.probability_up;
        let q = params.probability_down();
        let mut nodes = Vec::with_capacity(node_count(steps));

        nodes.push(Node {
            depth: 0,
            ups: 0,
            price: params.market.spot,
            probability: 1.0,
            time: 0.0,
            option_value: None,
            parent: None,
        });

        for k in 0..steps {
            let frontier = index(k, 0);
            let time = (k + 1) as f64 * params.time_step;

            for j in 0..=k + 1 {
                // Generated as the down child of (k, j), or as the up child
                // of the top node (k, k).
                let (parent, price) = if j <= k {
                    let parent = frontier + j;
                    (parent, nodes[parent].price * params.down)
                } else {
                    let parent = frontier + k;
                    (parent, nodes[parent].price * params.up)
                };

                let mut probability = 0.0;
                if j <= k {
                    probability += nodes[frontier + j].probability * q;
                }
                if j >= 1 {
                    probability += nodes[frontier + j - 1].probability * p;
                }

                nodes.push(Node {
                    depth: k + 1,
                    ups: j,
                    price,
                    probability,
                    time,
                    option_value: None,
                    parent: Some(parent),
                });
            }

            tracing::trace!(depth = k + 1, nodes = k + 2, "Built lattice level");
        }

        Self { steps, nodes }
    }

    /// Number of steps from root to maturity.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Number of distinct depths, `steps + 1`.
    #[must_use]
    pub fn depths(&self) -> usize {
        self.steps + 1
    }

    /// Total number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the lattice holds no nodes. A built lattice always
    /// holds at least the root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Arena index of node `(depth, ups)`.
    ///
    /// # Panics
    ///
    /// Panics if `depth > steps` or `ups > depth`.
    #[must_use]
    pub fn index(&self, depth: usize, ups: usize) -> usize {
        assert!(depth <= self.steps && ups <= depth, "node ({depth}, {ups}) outside lattice");
        index(depth, ups)
    }

    /// Returns the root node.
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    /// Returns node `(depth, ups)`, or `None` outside the lattice.
    #[must_use]
    pub fn node(&self, depth: usize, ups: usize) -> Option<&Node> {
        if depth > self.steps || ups > depth {
            return None;
        }
        self.nodes.get(index(depth, ups))
    }

    /// Returns the node at an arena index.
    #[must_use]
    pub fn get(&self, idx: usize) -> Option<&Node> {
        self.nodes.get(idx)
    }

    /// All nodes at a depth, ordered by increasing number of up moves.
    #[must_use]
    pub fn level(&self, depth: usize) -> &[Node] {
        if depth > self.steps {
            return &[];
        }
        let start = index(depth, 0);
        &self.nodes[start..=start + depth]
    }

    /// Nodes at maturity.
    #[must_use]
    pub fn terminal_nodes(&self) -> &[Node] {
        self.level(self.steps)
    }

    /// Arena index of the up-move child, absent at maturity.
    #[must_use]
    pub fn up(&self, idx: usize) -> Option<usize> {
        let node = self.nodes.get(idx)?;
        (node.depth < self.steps).then(|| index(node.depth + 1, node.ups + 1))
    }

    /// Arena index of the down-move child, absent at maturity.
    #[must_use]
    pub fn down(&self, idx: usize) -> Option<usize> {
        let node = self.nodes.get(idx)?;
        (node.depth < self.steps).then(|| index(node.depth + 1, node.ups))
    }

    /// Arena indices of the nodes this node is reachable from in one step,
    /// as `(via_up_move, via_down_move)`.
    #[must_use]
    pub fn parents(&self, idx: usize) -> (Option<usize>, Option<usize>) {
        let Some(node) = self.nodes.get(idx) else {
            return (None, None);
        };
        if node.depth == 0 {
            return (None, None);
        }
        let via_up = (node.ups >= 1).then(|| index(node.depth - 1, node.ups - 1));
        let via_down = (node.ups < node.depth).then(|| index(node.depth - 1, node.ups));
        (via_up, via_down)
    }

    /// Number of distinct root-to-node paths reaching `(depth, ups)`.
    ///
    /// Returns `None` outside the lattice or if the count overflows `u128`.
    #[must_use]
    pub fn path_count(&self, depth: usize, ups: usize) -> Option<u128> {
        if depth > self.steps || ups > depth {
            return None;
        }
        binomial(depth, ups)
    }

    /// Number of distinct root-to-maturity paths, `2^steps`.
    #[must_use]
    pub fn terminal_path_count(&self) -> Option<u128> {
        u32::try_from(self.steps)
            .ok()
            .and_then(|steps| 2_u128.checked_pow(steps))
    }

    /// Iterates over all nodes in depth order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Returns true once every node carries an option value.
    #[must_use]
    pub fn is_valued(&self) -> bool {
        self.nodes.iter().all(|n| n.option_value.is_some())
    }

    pub(crate) fn set_option_value(&mut self, idx: usize, value: f64) {
        let node = &mut self.nodes[idx];
        debug_assert!(node.option_value.is_none(), "node value set twice");
        node.option_value = Some(value);
    }
}

#[inline]
fn index(depth: usize, ups: usize) -> usize {
    depth * (depth + 1) / 2 + ups
}

fn node_count(steps: usize) -> usize {
    (steps + 1) * (steps + 2) / 2
}

fn binomial(n: usize, k: usize) -> Option<u128> {
    let k = k.min(n - k);
    let mut c: u128 = 1;
    for i in 0..k {
        // c * (n - i) is always divisible by (i + 1) at this point.
        c = c.checked_mul((n - i) as u128)? / (i as u128 + 1);
    }
    Some(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::MarketInputs;
    use crate::types::PricingModel;
    use approx::assert_relative_eq;

    fn textbook_params(steps: usize) -> LatticeParameters {
        let market = MarketInputs {
            spot: 100.0,
            rate: 5.0,
            dividend_yield: 0.0,
            maturity: 1.0,
            steps,
        };
        LatticeParameters::derive(market, &PricingModel::factors(1.2, 0.8)).unwrap()
    }

    fn textbook(steps: usize) -> Lattice {
        Lattice::build(&textbook_params(steps))
    }

    #[test]
    fn test_tree_shape() {
        let lattice = textbook(4);

        assert_eq!(lattice.steps(), 4);
        assert_eq!(lattice.depths(), 5);
        assert_eq!(lattice.len(), 15);
        assert_eq!(lattice.terminal_nodes().len(), 5);
        for depth in 0..=4 {
            assert_eq!(lattice.level(depth).len(), depth + 1);
        }
        assert!(lattice.level(5).is_empty());
    }

    #[test]
    fn test_root() {
        let lattice = textbook(3);
        let root = lattice.root();

        assert_eq!(root.price, 100.0);
        assert_eq!(root.probability, 1.0);
        assert_eq!(root.time, 0.0);
        assert!(root.parent.is_none());
        assert!(root.option_value.is_none());
    }

    #[test]
    fn test_prices_and_times() {
        let lattice = textbook(2);
        let terminal: Vec<f64> = lattice.terminal_nodes().iter().map(|n| n.price).collect();

        assert_relative_eq!(terminal[0], 64.0, epsilon = 1e-9);
        assert_relative_eq!(terminal[1], 96.0, epsilon = 1e-9);
        assert_relative_eq!(terminal[2], 144.0, epsilon = 1e-9);
        for node in lattice.level(1) {
            assert_relative_eq!(node.time, 0.5);
        }
        for node in lattice.terminal_nodes() {
            assert_relative_eq!(node.time, 1.0);
        }
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let lattice = textbook(12);
        for depth in 0..=12 {
            let total: f64 = lattice.level(depth).iter().map(|n| n.probability).sum();
            assert_relative_eq!(total, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_reach_probability_is_binomial() {
        let params = textbook_params(3);
        let lattice = Lattice::build(&params);
        let p = params.probability_up;

        // Three steps: dt = 1/3, so p differs from the two-step value.
        assert_relative_eq!(p, ((0.05_f64 / 3.0).exp() - 0.8) / 0.4, epsilon = 1e-12);
        for (ups, paths) in [(0, 1.0), (1, 3.0), (2, 3.0), (3, 1.0)] {
            let node = lattice.node(3, ups).unwrap();
            let expected = paths * p.powi(ups as i32) * (1.0 - p).powi(3 - ups as i32);
            assert_relative_eq!(node.probability, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_children_and_parents() {
        let lattice = textbook(2);
        let root = lattice.index(0, 0);

        assert_eq!(lattice.up(root), Some(lattice.index(1, 1)));
        assert_eq!(lattice.down(root), Some(lattice.index(1, 0)));

        // Middle terminal node recombines two paths.
        let middle = lattice.index(2, 1);
        assert_eq!(
            lattice.parents(middle),
            (Some(lattice.index(1, 0)), Some(lattice.index(1, 1)))
        );
        assert_eq!(lattice.up(middle), None);
        assert_eq!(lattice.down(middle), None);

        assert_eq!(lattice.get(middle).unwrap().parent, Some(lattice.index(1, 1)));
        assert_eq!(lattice.get(lattice.index(2, 2)).unwrap().parent, Some(lattice.index(1, 1)));
        assert_eq!(lattice.parents(root), (None, None));
    }

    #[test]
    fn test_path_counts() {
        let lattice = textbook(10);

        assert_eq!(lattice.path_count(10, 5), Some(252));
        assert_eq!(lattice.path_count(10, 0), Some(1));
        assert_eq!(lattice.path_count(11, 0), None);
        assert_eq!(lattice.terminal_path_count(), Some(1024));

        let total: u128 = (0..=10).filter_map(|j| lattice.path_count(10, j)).sum();
        assert_eq!(Some(total), lattice.terminal_path_count());
    }

    #[test]
    fn test_unvalued_after_build() {
        let lattice = textbook(3);
        assert!(!lattice.is_valued());
        assert!(lattice.iter().all(|n| n.option_value.is_none()));
    }
}
