//! Position-ordered viewer request queue.

use crate::show::{Request, Sequence};

/// Index of the request with the lowest position. Earliest entry wins ties.
fn head_index(requests: &[Request]) -> Option<usize> {
    requests
        .iter()
        .enumerate()
        .min_by_key(|(_, request)| request.position)
        .map(|(i, _)| i)
}

/// The request that would be popped next, without removing it.
pub fn peek_next(requests: &[Request]) -> Option<&Request> {
    head_index(requests).map(|i| &requests[i])
}

/// Remove and return the lowest-position request. `None` on an empty queue.
pub fn pop_next(requests: &mut Vec<Request>) -> Option<Request> {
    head_index(requests).map(|i| requests.remove(i))
}

/// Position one past the current back of the queue, or 1 when empty.
pub fn next_position(requests: &[Request]) -> i32 {
    requests
        .iter()
        .map(|request| request.position)
        .max()
        .map_or(1, |max| max + 1)
}

/// Append a system-generated request at the back of the queue.
pub fn enqueue(requests: &mut Vec<Request>, sequence: Sequence) {
    let position = next_position(requests);
    requests.push(Request {
        sequence,
        position,
        owner_requested: false,
        viewer_requested: None,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, position: i32) -> Request {
        Request {
            sequence: Sequence::new(name, position, position),
            position,
            owner_requested: false,
            viewer_requested: None,
        }
    }

    #[test]
    fn pops_minimum_position_regardless_of_order() {
        let mut queue = vec![request("C", 7), request("A", 2), request("B", 5)];
        let popped = pop_next(&mut queue).unwrap();
        assert_eq!(popped.sequence.name, "A");
        assert_eq!(queue.len(), 2);
        assert!(queue.iter().all(|r| r.sequence.name != "A"));
    }

    #[test]
    fn popping_drains_in_position_order() {
        let mut queue = vec![request("C", 30), request("A", 10), request("B", 20)];
        let order: Vec<_> = std::iter::from_fn(|| pop_next(&mut queue))
            .map(|r| r.sequence.name)
            .collect();
        assert_eq!(order, ["A", "B", "C"]);
    }

    #[test]
    fn empty_queue_pops_none() {
        let mut queue = Vec::new();
        assert!(pop_next(&mut queue).is_none());
        assert!(peek_next(&queue).is_none());
    }

    #[test]
    fn equal_positions_pop_earliest_entry() {
        let mut queue = vec![request("First", 1), request("Second", 1)];
        assert_eq!(pop_next(&mut queue).unwrap().sequence.name, "First");
    }

    #[test]
    fn enqueue_goes_to_the_back() {
        let mut queue = vec![request("A", 4), request("B", 9)];
        enqueue(&mut queue, Sequence::new("PSA", 99, 99));
        assert_eq!(queue[2].position, 10);

        let mut empty = Vec::new();
        enqueue(&mut empty, Sequence::new("PSA", 99, 99));
        assert_eq!(empty[0].position, 1);
    }
}
