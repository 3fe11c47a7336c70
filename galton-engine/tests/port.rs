// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

use std::cell::RefCell;
use std::rc::Rc;

use galton_engine::port::{InPort, OutPort};
use galton_engine::run_simulation;
use galton_engine::test_helpers::start_test;

#[test]
fn get_returns_none_after_close() {
    let mut engine = start_test(file!());
    let top = engine.top().clone();

    let rx: InPort<i32> = InPort::new(&top, "rx");
    let mut tx = OutPort::new(&top, "tx");
    tx.connect(rx.state()).unwrap();

    engine.spawn(async move {
        for i in 0..5 {
            tx.put(i)?.await;
        }
        tx.close()
    });

    let received = Rc::new(RefCell::new(Vec::new()));
    {
        let received = received.clone();
        engine.spawn(async move {
            while let Some(value) = rx.get()?.await {
                received.borrow_mut().push(value);
            }
            assert!(rx.is_closed());
            Ok(())
        });
    }
    run_simulation!(engine);

    assert_eq!(*received.borrow(), vec![0, 1, 2, 3, 4]);
}

#[test]
fn close_without_data() {
    let mut engine = start_test(file!());
    let top = engine.top().clone();

    let rx: InPort<i32> = InPort::new(&top, "rx");
    let mut tx = OutPort::new(&top, "tx");
    tx.connect(rx.state()).unwrap();

    engine.spawn(async move { tx.close() });

    let finished = Rc::new(RefCell::new(false));
    {
        let finished = finished.clone();
        engine.spawn(async move {
            assert!(rx.get()?.await.is_none());
            *finished.borrow_mut() = true;
            Ok(())
        });
    }
    run_simulation!(engine);

    assert!(*finished.borrow());
}

#[test]
fn fan_in_closes_after_last_producer() {
    let mut engine = start_test(file!());
    let top = engine.top().clone();

    let rx: InPort<i32> = InPort::new_with_producers(&top, "rx", 2).unwrap();
    let mut tx_a = OutPort::new(&top, "tx_a");
    let mut tx_b = OutPort::new(&top, "tx_b");
    tx_a.connect(rx.state()).unwrap();
    tx_b.connect(rx.state()).unwrap();

    // `tx_a` closes long before `tx_b` has finished sending
    engine.spawn(async move {
        tx_a.put(0)?.await;
        tx_a.close()
    });
    engine.spawn(async move {
        for i in 10..20 {
            tx_b.put(i)?.await;
        }
        tx_b.close()
    });

    let received = Rc::new(RefCell::new(Vec::new()));
    {
        let received = received.clone();
        engine.spawn(async move {
            while let Some(value) = rx.get()?.await {
                received.borrow_mut().push(value);
            }
            Ok(())
        });
    }
    run_simulation!(engine);

    let mut received = received.borrow().clone();
    received.sort_unstable();
    let mut expected = vec![0];
    expected.extend(10..20);
    assert_eq!(received, expected);
}

#[test]
fn put_waits_for_consumer() {
    let mut engine = start_test(file!());
    let top = engine.top().clone();

    let rx: InPort<i32> = InPort::new(&top, "rx");
    let mut tx = OutPort::new(&top, "tx");
    tx.connect(rx.state()).unwrap();

    let events = Rc::new(RefCell::new(Vec::new()));
    {
        let events = events.clone();
        engine.spawn(async move {
            for i in 0..2 {
                tx.put(i)?.await;
                events.borrow_mut().push(format!("sent {i}"));
            }
            tx.close()
        });
    }
    {
        let events = events.clone();
        engine.spawn(async move {
            while let Some(value) = rx.get()?.await {
                events.borrow_mut().push(format!("got {value}"));
            }
            Ok(())
        });
    }
    run_simulation!(engine);

    assert_eq!(
        *events.borrow(),
        vec!["got 0", "sent 0", "got 1", "sent 1"]
    );
}

#[test]
fn missing_producer_leaves_channel_open() {
    let mut engine = start_test(file!());
    let top = engine.top().clone();

    let rx: InPort<i32> = InPort::new_with_producers(&top, "rx", 2).unwrap();
    let mut tx = OutPort::new(&top, "tx");
    tx.connect(rx.state()).unwrap();

    engine.spawn(async move { tx.close() });

    let finished = Rc::new(RefCell::new(false));
    {
        let finished = finished.clone();
        engine.spawn(async move {
            while rx.get()?.await.is_some() {}
            *finished.borrow_mut() = true;
            Ok(())
        });
    }

    // The engine stops once nothing can make progress
    run_simulation!(engine);
    assert!(!*finished.borrow());
}

#[test]
fn no_more_producers_than_declared() {
    let engine = start_test(file!());
    let top = engine.top().clone();

    let rx: InPort<i32> = InPort::new_with_producers(&top, "rx", 2).unwrap();
    let mut tx_a = OutPort::new(&top, "tx_a");
    let mut tx_b = OutPort::new(&top, "tx_b");
    tx_a.connect(rx.state()).unwrap();
    tx_b.connect(rx.state()).unwrap();

    let Err(e) = rx.state() else {
        panic!("a third producer should be refused");
    };
    assert_eq!(e.to_string(), "Error: top::rx already connected");
    assert_eq!(rx.num_connected(), 2);
}
