//! ERC20 contract bindings
//!
//! Only the surface the client touches: balances and router approvals.

use alloy::sol;

sol! {
    /// Minimal ERC20 interface
    #[sol(rpc)]
    interface IERC20 {
        /// Returns the decimals of the token
        function decimals() external view returns (uint8);

        /// Returns the balance of an account
        function balanceOf(address account) external view returns (uint256);

        /// Returns the allowance of a spender
        function allowance(address owner, address spender) external view returns (uint256);

        /// Approves a spender to spend tokens
        function approve(address spender, uint256 amount) external returns (bool);
    }
}
