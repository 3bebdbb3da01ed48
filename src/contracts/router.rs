//! AMM router contract bindings

use alloy::sol;

sol! {
    /// UniswapV2-style router, exact-input entry points only.
    ///
    /// The swap family differs in payability and path composition: the
    /// ETH-in variant carries the input amount as call value and expects the
    /// path to start at the wrapped native token.
    #[sol(rpc)]
    interface IUniswapV2Router02 {
        /// Swap an exact amount of input tokens along `path`
        function swapExactTokensForTokens(
            uint256 amountIn,
            uint256 amountOutMin,
            address[] calldata path,
            address to,
            uint256 deadline
        ) external returns (uint256[] memory amounts);

        /// Swap exact native token (sent as call value) for tokens
        function swapExactETHForTokens(
            uint256 amountOutMin,
            address[] calldata path,
            address to,
            uint256 deadline
        ) external payable returns (uint256[] memory amounts);

        /// Swap an exact amount of tokens for native token
        function swapExactTokensForETH(
            uint256 amountIn,
            uint256 amountOutMin,
            address[] calldata path,
            address to,
            uint256 deadline
        ) external returns (uint256[] memory amounts);
    }
}
