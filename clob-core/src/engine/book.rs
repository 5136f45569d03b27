use crate::engine::types::{Order, OrderId, Side};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// One slot in a price level's intrusive doubly-linked order queue.
struct Slot {
    order: Order,
    prev: Option<usize>,
    next: Option<usize>,
}

/// All resting orders at a single price, in strict time priority.
///
/// Orders are stored in a slab (`Vec<Option<Slot>>`) linked by index, so
/// that removing an order from the middle of the queue (the common case
/// for a cancel) is O(1), unlike a `VecDeque`, which would need an O(n)
/// scan to find and excise an arbitrary element.
pub struct PriceLevel {
    price: Decimal,
    slots: Vec<Option<Slot>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    index: HashMap<OrderId, usize>,
    total_volume: Decimal,
}

impl PriceLevel {
    fn new(price: Decimal) -> Self {
        Self {
            price,
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            index: HashMap::new(),
            total_volume: Decimal::ZERO,
        }
    }

    #[must_use]
    pub fn price(&self) -> Decimal {
        self.price
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    #[must_use]
    pub fn order_count(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn total_volume(&self) -> Decimal {
        self.total_volume
    }

    /// Append an order to the tail of the queue: it joins the back of
    /// time priority at this price.
    pub fn push_back(&mut self, order: Order) {
        self.total_volume += order.remaining();
        let id = order.id;
        let slot = Slot {
            order,
            prev: self.tail,
            next: None,
        };
        let index = if let Some(free_index) = self.free.pop() {
            self.slots[free_index] = Some(slot);
            free_index
        } else {
            self.slots.push(Some(slot));
            self.slots.len() - 1
        };
        if let Some(tail) = self.tail {
            self.slots[tail].as_mut().unwrap().next = Some(index);
        } else {
            self.head = Some(index);
        }
        self.tail = Some(index);
        self.index.insert(id, index);
    }

    /// The resting order at the head of the queue, the next to be
    /// matched against incoming liquidity.
    #[must_use]
    pub fn front(&self) -> Option<&Order> {
        self.head.map(|i| &self.slots[i].as_ref().unwrap().order)
    }

    #[must_use]
    pub fn front_mut(&mut self) -> Option<&mut Order> {
        self.head
            .map(move |i| &mut self.slots[i].as_mut().unwrap().order)
    }

    /// Record a partial fill applied to the order at the head of the
    /// queue, keeping `total_volume` consistent.
    pub fn reduce_front(&mut self, filled_quantity: Decimal) {
        self.total_volume -= filled_quantity;
    }

    /// Remove and return the order at the head of the queue.
    pub fn pop_front(&mut self) -> Option<Order> {
        let head = self.head?;
        self.unlink(head);
        let slot = self.slots[head].take().unwrap();
        self.free.push(head);
        self.index.remove(&slot.order.id);
        Some(slot.order)
    }

    /// Remove an arbitrary order by id, the cancel path.
    pub fn remove(&mut self, order_id: OrderId) -> Option<Order> {
        let index = self.index.remove(&order_id)?;
        self.unlink(index);
        let slot = self.slots[index].take().unwrap();
        self.free.push(index);
        self.total_volume -= slot.order.remaining();
        Some(slot.order)
    }

    fn unlink(&mut self, index: usize) {
        let (prev, next) = {
            let slot = self.slots[index].as_ref().unwrap();
            (slot.prev, slot.next)
        };
        match prev {
            Some(p) => self.slots[p].as_mut().unwrap().next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.slots[n].as_mut().unwrap().prev = prev,
            None => self.tail = prev,
        }
    }

    /// Iterate orders head-to-tail (oldest first) without removing them.
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let index = cursor?;
            let slot = self.slots[index].as_ref().unwrap();
            cursor = slot.next;
            Some(&slot.order)
        })
    }
}

/// Descending-price sort key for the bid side: a `BTreeMap` keyed on this
/// type iterates highest price first, matching a buy book's natural
/// priority order, while the ask side uses `Decimal` directly for
/// ascending (lowest-first) iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BidKey(Decimal);

impl Ord for BidKey {
    fn cmp(&self, other: &Self) -> Ordering {
        other.0.cmp(&self.0)
    }
}

impl PartialOrd for BidKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A snapshot-friendly read view over one side of the book: best price
/// and per-level depth, in priority order.
#[derive(Debug, Clone, Default)]
pub struct BookView {
    pub bids: Vec<(Decimal, Decimal)>,
    pub asks: Vec<(Decimal, Decimal)>,
}

/// The order book for a single symbol: two price-sorted ladders of
/// [`PriceLevel`]s plus an order-id registry for O(log n) lookup and
/// cancellation.
pub struct OrderBook {
    bids: BTreeMap<BidKey, PriceLevel>,
    asks: BTreeMap<Decimal, PriceLevel>,
    locations: HashMap<OrderId, (Side, Decimal)>,
}

impl OrderBook {
    #[must_use]
    pub fn new() -> Self {
        Self {
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            locations: HashMap::new(),
        }
    }

    #[must_use]
    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.keys().next().map(|k| k.0)
    }

    #[must_use]
    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.keys().next().map(|k| *k)
    }

    /// Mutable access to the best (first) level on `side`, used by the
    /// matching loop to walk and drain resting liquidity.
    pub fn best_level_mut(&mut self, side: Side) -> Option<&mut PriceLevel> {
        match side {
            Side::Buy => self.bids.values_mut().next(),
            Side::Sell => self.asks.values_mut().next(),
        }
    }

    /// Drop a price level once it has been fully drained, matching the
    /// original implementation's cleanup of empty levels after every fill.
    pub fn prune_if_empty(&mut self, side: Side, price: Decimal) {
        match side {
            Side::Buy => self.bids.retain(|k, level| !(k.0 == price && level.is_empty())),
            Side::Sell => self.asks.retain(|k, level| !(*k == price && level.is_empty())),
        }
    }

    /// Add an order to its level, creating the level if this is the first
    /// resting order at that price. Also registers the order for O(1)
    /// side/price lookup on cancel.
    pub fn add_resting(&mut self, order: Order) {
        let side = order.side;
        let price = order.price.expect("resting order must be a priced limit order");
        self.locations.insert(order.id, (side, price));
        match side {
            Side::Buy => self
                .bids
                .entry(BidKey(price))
                .or_insert_with(|| PriceLevel::new(price))
                .push_back(order),
            Side::Sell => self
                .asks
                .entry(price)
                .or_insert_with(|| PriceLevel::new(price))
                .push_back(order),
        }
    }

    /// Remove a resting order by id, the cancel path. Cleans up an
    /// emptied level.
    pub fn remove(&mut self, order_id: OrderId) -> Option<Order> {
        let (side, price) = self.locations.remove(&order_id)?;
        let removed = match side {
            Side::Buy => self.bids.get_mut(&BidKey(price)).and_then(|l| l.remove(order_id)),
            Side::Sell => self.asks.get_mut(&price).and_then(|l| l.remove(order_id)),
        };
        self.prune_if_empty(side, price);
        removed
    }

    #[must_use]
    pub fn contains(&self, order_id: OrderId) -> bool {
        self.locations.contains_key(&order_id)
    }

    /// Record a fill applied against the resting order at the head of a
    /// level, without removing the level itself (the caller pops/prunes
    /// separately once the order is fully filled).
    pub fn note_fill(&mut self, side: Side, price: Decimal, filled_quantity: Decimal) {
        let level = match side {
            Side::Buy => self.bids.get_mut(&BidKey(price)),
            Side::Sell => self.asks.get_mut(&price),
        };
        if let Some(level) = level {
            level.reduce_front(filled_quantity);
        }
    }

    /// Pop the fully-filled order at the head of a level and deregister it.
    pub fn pop_filled(&mut self, side: Side, price: Decimal) -> Option<Order> {
        let level = match side {
            Side::Buy => self.bids.get_mut(&BidKey(price)),
            Side::Sell => self.asks.get_mut(&price),
        }?;
        let order = level.pop_front()?;
        self.locations.remove(&order.id);
        self.prune_if_empty(side, price);
        Some(order)
    }

    /// Total resting volume at an exact price, zero if the level doesn't
    /// exist.
    #[must_use]
    pub fn volume_at(&self, side: Side, price: Decimal) -> Decimal {
        match side {
            Side::Buy => self
                .bids
                .get(&BidKey(price))
                .map_or(Decimal::ZERO, PriceLevel::total_volume),
            Side::Sell => self
                .asks
                .get(&price)
                .map_or(Decimal::ZERO, PriceLevel::total_volume),
        }
    }

    /// Top `depth` price levels on each side, best price first.
    #[must_use]
    pub fn depth(&self, depth: usize) -> BookView {
        BookView {
            bids: self
                .bids
                .iter()
                .take(depth)
                .map(|(k, l)| (k.0, l.total_volume()))
                .collect(),
            asks: self
                .asks
                .iter()
                .take(depth)
                .map(|(k, l)| (*k, l.total_volume()))
                .collect(),
        }
    }

    #[must_use]
    pub fn spread(&self) -> Option<Decimal> {
        Some(self.best_ask()? - self.best_bid()?)
    }

    #[must_use]
    pub fn mid_price(&self) -> Option<Decimal> {
        Some((self.best_ask()? + self.best_bid()?) / Decimal::TWO)
    }
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}
