//! Tests for autograd operations with gradient checking

mod prop_loss;
