//! Petshop prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartLine, LineKey, ProductQuantity, product_quantities},
    checkout::{CheckoutDetails, CheckoutError, CheckoutPayment, OrderMessage, PickupTime, Service},
    customers::{Customer, CustomerError, CustomerUuid, NewCustomer, PetProfile},
    discounts::{DiscountWindow, is_discount_active},
    inventory::{
        InventoryDefaults, InventoryError, InventoryRecord, InventoryUuid, StockAdjustment,
        StockFlags, Valuation, valuation,
    },
    orders::{
        Order, OrderDraft, OrderError, OrderLine, OrderStatus, OrderType, OrderUuid, PaymentStatus,
    },
    payments::{
        NewPayment, Payment, PaymentMethod, PaymentUuid, SettledPayment, Settlement,
        SettlementError, Tender,
    },
    prices::{Price, PriceError, centavos, pesos, zero},
    pricing::{AddOnSelection, PricingError, line_total, preview, total_price, unit_price},
    products::{AddOn, AddOnUuid, Product, ProductUuid, StockLevel, Variation, VariationUuid},
    receipt::{Receipt, ReceiptError, ReceiptPayment},
    uuids::TypedUuid,
};
